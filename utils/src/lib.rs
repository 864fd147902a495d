use std::path::{Path, PathBuf};
use std::fs::File;
use std::io::{self, Write, Read};

/// Appends `extension` when the path does not carry one already
pub fn with_default_extension(filepath:&Path,extension:&str) -> PathBuf {
    match filepath.extension() {
        Some(_) => filepath.to_owned(),
        None => filepath.with_extension(extension)
    }
}

pub fn read_to_string(filepath:&Path,extension:&str) -> io::Result<String> {
    let p = with_default_extension(filepath,extension);
    let mut f = File::open(&p).map_err(|e| io::Error::new(e.kind(),format!("cannot open file {:?}: {}",p,e)))?;
    let mut s = String::new();
    f.read_to_string(&mut s)?;
    Ok(s)
}

pub fn write_to_file(filepath:&Path,extension:&str,string:&str) -> io::Result<PathBuf> {
    let p = with_default_extension(filepath,extension);
    let mut f = File::create(&p)?;
    f.write_all(string.as_bytes())?;
    Ok(p)
}

/// `n` evenly spaced samples from `start` to `stop` inclusive
pub fn linspace(start:f64,stop:f64,n:usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| match i == n - 1 {
                true => stop,
                false => start + step * i as f64
            }).collect()
        }
    }
}

#[test]
fn linspace_endpoints(){
    let v = linspace(300.0,5000.0,48);
    assert_eq!(v.len(), 48);
    assert_eq!(v[0], 300.0);
    assert_eq!(v[47], 5000.0);
    assert!(v.windows(2).all(|w| w[1] > w[0]));
    assert!(linspace(0.0,1.0,0).is_empty());
    assert_eq!(linspace(2.0,3.0,1), vec![2.0]);
}

#[test]
fn extension_is_added_only_when_missing(){
    assert_eq!(with_default_extension(Path::new("a/sim"),"mp2rage"), PathBuf::from("a/sim.mp2rage"));
    assert_eq!(with_default_extension(Path::new("a/sim.toml"),"mp2rage"), PathBuf::from("a/sim.toml"));
}

#[test]
fn write_then_read(){
    let dir = tempfile::tempdir().unwrap();
    let written = write_to_file(&dir.path().join("notes"),"txt","TI1 = 700").unwrap();
    assert_eq!(written, dir.path().join("notes.txt"));
    assert_eq!(read_to_string(&dir.path().join("notes"),"txt").unwrap(), "TI1 = 700");
    assert!(read_to_string(&dir.path().join("missing"),"txt").is_err());
}
