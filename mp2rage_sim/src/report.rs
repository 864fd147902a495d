use std::fmt;
use std::io::Write;
use serde::Serialize;
use crate::error::SimResult;
use crate::simulator::TissueOutcome;

/// Flat record of one simulated tissue, as written to CSV or JSON
#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct ReportRow {
    pub tissue:String,
    #[serde(rename = "T1")]
    pub t1:f64,
    #[serde(rename = "PD")]
    pub pd:f64,
    #[serde(rename = "T2star")]
    pub t2star:f64,
    #[serde(rename = "B1minus")]
    pub b1minus:f64,
    #[serde(rename = "Mzss")]
    pub mzss:Option<f64>,
    #[serde(rename = "INV1")]
    pub inv1:Option<f64>,
    #[serde(rename = "INV2")]
    pub inv2:Option<f64>,
    #[serde(rename = "UNI")]
    pub uni:Option<f64>,
    pub error:Option<String>,
}

impl From<&TissueOutcome> for ReportRow {
    fn from(o: &TissueOutcome) -> Self {
        let (signals, error) = match &o.result {
            Ok(r) => (Some(*r), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            tissue: o.name.clone(),
            t1: o.tissue.t1,
            pd: o.tissue.pd,
            t2star: o.tissue.t2star,
            b1minus: o.tissue.b1minus,
            mzss: signals.map(|s| s.mzss),
            inv1: signals.map(|s| s.inv1),
            inv2: signals.map(|s| s.inv2),
            uni: signals.map(|s| s.uni),
            error,
        }
    }
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:<16}{:>8.0}{:>7.2}", self.tissue, self.t1, self.pd)?;
        match (&self.error, self.mzss, self.inv1, self.inv2, self.uni) {
            (None, Some(m), Some(i1), Some(i2), Some(u)) => write!(f, "{:>12.6}{:>12.6}{:>12.6}{:>12.6}", m, i1, i2, u),
            (Some(e), ..) => write!(f, "  error: {}", e),
            _ => write!(f, "  no result"),
        }
    }
}

pub fn rows(outcomes:&[TissueOutcome]) -> Vec<ReportRow> {
    outcomes.iter().map(ReportRow::from).collect()
}

pub fn table_header() -> String {
    format!("{:<16}{:>8}{:>7}{:>12}{:>12}{:>12}{:>12}", "tissue", "T1", "PD", "Mzss", "INV1", "INV2", "UNI")
}

/// Renders any displayable rows under a header line
pub fn to_table<R:fmt::Display>(header:&str,rows:&[R]) -> String {
    let mut s = String::from(header);
    for r in rows {
        s.push('\n');
        s.push_str(&r.to_string());
    }
    s
}

pub fn write_csv<W:Write,R:Serialize>(writer:W,rows:&[R]) -> SimResult<()> {
    let mut w = csv::Writer::from_writer(writer);
    for r in rows {
        w.serialize(r)?;
    }
    w.flush()?;
    Ok(())
}

pub fn to_json<R:Serialize>(rows:&[R]) -> SimResult<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::signal::SignalResult;
    use crate::tissue::TissueParameters;

    fn outcomes() -> Vec<TissueOutcome> {
        let t = TissueParameters::new(1500.0,0.9).unwrap();
        vec![
            TissueOutcome {
                name: "Grey Matter".to_string(),
                tissue: t,
                result: Ok(SignalResult { mzss: 0.8, inv1: -0.02, inv2: -0.08, uni: 0.25 }),
            },
            TissueOutcome {
                name: "broken".to_string(),
                tissue: t,
                result: Err(SimError::DegenerateDenominator { term: "EC", value: 0.0 }),
            },
        ]
    }

    #[test]
    fn csv_has_header_and_empty_cells_for_errors(){
        let mut buf = Vec::<u8>::new();
        write_csv(&mut buf,&rows(&outcomes())).unwrap();
        let s = String::from_utf8(buf).unwrap();
        let lines:Vec<&str> = s.lines().collect();
        assert_eq!(lines[0], "tissue,T1,PD,T2star,B1minus,Mzss,INV1,INV2,UNI,error");
        assert_eq!(lines[1], "Grey Matter,1500.0,0.9,30.0,1.0,0.8,-0.02,-0.08,0.25,");
        assert!(lines[2].starts_with("broken,1500.0,0.9,30.0,1.0,,,,,"));
        assert!(lines[2].contains("EC"));
    }

    #[test]
    fn json_keeps_field_names(){
        let j = to_json(&rows(&outcomes())).unwrap();
        let v:serde_json::Value = serde_json::from_str(&j).unwrap();
        assert_eq!(v[0]["INV1"], -0.02);
        assert!(v[0]["error"].is_null());
        assert!(v[1]["UNI"].is_null());
    }

    #[test]
    fn table_reports_errors_inline(){
        let t = to_table(&table_header(),&rows(&outcomes()));
        assert_eq!(t.lines().count(), 3);
        assert!(t.lines().nth(2).unwrap().contains("error: degenerate denominator in EC"));
    }
}
