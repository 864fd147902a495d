use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::{SimError, SimResult};
use crate::protocol::Protocol;
use crate::tissue::{NamedTissue, TissueParameters, DEFAULT_B1MINUS, DEFAULT_T2STAR};

pub trait Config {
    fn default() -> Self;
}

pub trait ConfigFile: Sized {
    fn to_file(&self,filename:&Path) -> SimResult<PathBuf>;
    fn from_file(filename:&Path) -> SimResult<Self>;
    fn file_ext() -> String;
}

/// One protocol and the tissues to run under it
#[derive(Clone,Debug,PartialEq)]
pub struct SimulationConfig {
    pub protocol:Protocol,
    pub tissues:Vec<NamedTissue>,
}

impl Config for SimulationConfig {
    fn default() -> Self {
        let tissue = |name:&str,t1:f64,pd:f64,t2star:f64| NamedTissue::new(name, TissueParameters {
            t1,
            pd,
            t2star,
            b1minus: DEFAULT_B1MINUS,
        });
        Self {
            protocol: Protocol::default(),
            tissues: vec![
                tissue("White Matter",1200.0,0.69,30.0),
                tissue("Grey Matter",2000.0,0.8,40.0),
                tissue("CSF",4400.0,1.0,200.0),
            ],
        }
    }
}

impl ConfigFile for SimulationConfig {
    fn to_file(&self, filename: &Path) -> SimResult<PathBuf> {
        let t = self.to_toml()?;
        Ok(utils::write_to_file(filename,&Self::file_ext(),&t)?)
    }

    fn from_file(filename: &Path) -> SimResult<Self> {
        let t = utils::read_to_string(filename,&Self::file_ext())?;
        Self::from_toml(&t)
    }

    fn file_ext() -> String {
        String::from("mp2rage")
    }
}

impl SimulationConfig {
    pub fn from_toml(s:&str) -> SimResult<Self> {
        let doc:ConfigDocument = toml::from_str(s)?;
        let protocol = doc.protocol.into_protocol()?;
        let tissues = doc.tissues.into_iter()
            .enumerate()
            .map(|(i,entry)| entry.into_tissue(i))
            .collect::<SimResult<Vec<NamedTissue>>>()?;
        Ok(Self { protocol, tissues })
    }

    pub fn to_toml(&self) -> SimResult<String> {
        let doc = ConfigDocument {
            protocol: ProtocolEntry::from(&self.protocol),
            tissues: self.tissues.iter().map(TissueEntry::from).collect(),
        };
        Ok(toml::to_string_pretty(&doc)?)
    }
}

// On-disk layout. Every key is optional here so that a missing key is
// reported as an invalid protocol or tissue instead of a parse error.

#[derive(Serialize,Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    protocol:ProtocolEntry,
    #[serde(default)]
    tissues:Vec<TissueEntry>,
}

#[derive(Default,Serialize,Deserialize)]
struct ProtocolEntry {
    #[serde(rename = "TR_MP2RAGE", skip_serializing_if = "Option::is_none")]
    tr_mp2rage:Option<f64>,
    #[serde(rename = "TI1", skip_serializing_if = "Option::is_none")]
    ti1:Option<f64>,
    #[serde(rename = "TI2", skip_serializing_if = "Option::is_none")]
    ti2:Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alpha1:Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alpha2:Option<f64>,
    #[serde(rename = "TR_GRE", skip_serializing_if = "Option::is_none")]
    tr_gre:Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    n:Option<i64>,
    #[serde(rename = "TE", skip_serializing_if = "Option::is_none")]
    te:Option<f64>,
}

fn required<T>(value:Option<T>,key:&str) -> SimResult<T> {
    value.ok_or_else(|| SimError::InvalidProtocol(format!("missing required field {}", key)))
}

impl ProtocolEntry {
    fn into_protocol(self) -> SimResult<Protocol> {
        let n = required(self.n,"n")?;
        let n = u32::try_from(n).map_err(|_| SimError::InvalidProtocol(format!("n must be a positive count, got {}", n)))?;
        Protocol::new(
            required(self.tr_mp2rage,"TR_MP2RAGE")?,
            required(self.ti1,"TI1")?,
            required(self.ti2,"TI2")?,
            required(self.alpha1,"alpha1")?,
            required(self.alpha2,"alpha2")?,
            required(self.tr_gre,"TR_GRE")?,
            n,
            required(self.te,"TE")?,
        )
    }
}

impl From<&Protocol> for ProtocolEntry {
    fn from(p: &Protocol) -> Self {
        Self {
            tr_mp2rage: Some(p.tr_mp2rage),
            ti1: Some(p.ti1),
            ti2: Some(p.ti2),
            alpha1: Some(p.alpha1),
            alpha2: Some(p.alpha2),
            tr_gre: Some(p.tr_gre),
            n: Some(i64::from(p.n)),
            te: Some(p.te),
        }
    }
}

#[derive(Serialize,Deserialize)]
struct TissueEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    name:Option<String>,
    #[serde(rename = "T1", skip_serializing_if = "Option::is_none")]
    t1:Option<f64>,
    #[serde(rename = "PD", skip_serializing_if = "Option::is_none")]
    pd:Option<f64>,
    #[serde(rename = "T2star", skip_serializing_if = "Option::is_none")]
    t2star:Option<f64>,
    #[serde(rename = "B1minus", skip_serializing_if = "Option::is_none")]
    b1minus:Option<f64>,
}

impl TissueEntry {
    fn into_tissue(self,index:usize) -> SimResult<NamedTissue> {
        let name = self.name.unwrap_or_else(|| format!("tissue_{}", index));
        let missing = |key:&str| SimError::InvalidTissue(format!("{}: missing required field {}", name, key));
        let t1 = self.t1.ok_or_else(|| missing("T1"))?;
        let pd = self.pd.ok_or_else(|| missing("PD"))?;
        let params = TissueParameters::with_all(
            t1,
            pd,
            self.t2star.unwrap_or(DEFAULT_T2STAR),
            self.b1minus.unwrap_or(DEFAULT_B1MINUS),
        ).map_err(|e| match e {
            SimError::InvalidTissue(msg) => SimError::InvalidTissue(format!("{}: {}", name, msg)),
            other => other,
        })?;
        Ok(NamedTissue { name, params })
    }
}

impl From<&NamedTissue> for TissueEntry {
    fn from(t: &NamedTissue) -> Self {
        Self {
            name: Some(t.name.clone()),
            t1: Some(t.params.t1),
            pd: Some(t.params.pd),
            t2star: Some(t.params.t2star),
            b1minus: Some(t.params.b1minus),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE:&str = r#"
[protocol]
TR_MP2RAGE = 6000.0
TI1 = 700.0
TI2 = 2500.0
alpha1 = 4.0
alpha2 = 5.0
TR_GRE = 6.5
n = 160
TE = 3.0

[[tissues]]
name = "White Matter"
T1 = 1200.0
PD = 0.69

[[tissues]]
name = "CSF"
T1 = 4400.0
PD = 1.0
T2star = 200.0
B1minus = 0.8
"#;

    #[test]
    fn parses_protocol_and_tissues(){
        let c = SimulationConfig::from_toml(EXAMPLE).unwrap();
        assert_eq!(c.protocol, Protocol::default());
        assert_eq!(c.tissues.len(), 2);
        assert_eq!(c.tissues[0].params.t2star, DEFAULT_T2STAR);
        assert_eq!(c.tissues[0].params.b1minus, DEFAULT_B1MINUS);
        assert_eq!(c.tissues[1].name, "CSF");
        assert_eq!(c.tissues[1].params.b1minus, 0.8);
    }

    #[test]
    fn missing_protocol_key_is_invalid_protocol(){
        let s = EXAMPLE.replace("TI2 = 2500.0\n", "");
        match SimulationConfig::from_toml(&s) {
            Err(SimError::InvalidProtocol(msg)) => assert!(msg.contains("TI2")),
            other => panic!("expected invalid protocol, got {:?}", other),
        }
    }

    #[test]
    fn negative_count_is_invalid_protocol(){
        let s = EXAMPLE.replace("n = 160", "n = -4");
        assert!(matches!(SimulationConfig::from_toml(&s), Err(SimError::InvalidProtocol(_))));
    }

    #[test]
    fn bad_tissue_names_the_tissue(){
        let s = EXAMPLE.replace("T1 = 4400.0", "T1 = -4400.0");
        match SimulationConfig::from_toml(&s) {
            Err(SimError::InvalidTissue(msg)) => assert!(msg.starts_with("CSF")),
            other => panic!("expected invalid tissue, got {:?}", other),
        }
    }

    #[test]
    fn loaded_values_are_validated(){
        let s = EXAMPLE.replace("alpha2 = 5.0", "alpha2 = 120.0");
        assert!(matches!(SimulationConfig::from_toml(&s), Err(SimError::InvalidProtocol(_))));
        let s = EXAMPLE.replace("PD = 0.69", "PD = 0.0");
        assert!(matches!(SimulationConfig::from_toml(&s), Err(SimError::InvalidTissue(_))));
    }

    #[test]
    fn default_template_survives_toml(){
        let c = SimulationConfig::default();
        let back = SimulationConfig::from_toml(&c.to_toml().unwrap()).unwrap();
        assert_eq!(c, back);
    }
}
