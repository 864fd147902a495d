use std::fmt;
use rayon::prelude::*;
use serde::Serialize;
use crate::error::{SimError, SimResult};
use crate::simulator::Mp2rageSimulator;
use crate::tissue::{TissueParameters, DEFAULT_B1MINUS, DEFAULT_T2STAR};

/// Range of T1 values to run with fixed PD, T2* and receive field
#[derive(Clone,Copy,Debug)]
pub struct SweepSpec {
    pub t1_min:f64,
    pub t1_max:f64,
    pub steps:usize,
    pub pd:f64,
    pub t2star:f64,
    pub b1minus:f64,
}

impl SweepSpec {
    pub fn new(t1_min:f64,t1_max:f64,steps:usize) -> Self {
        Self { t1_min, t1_max, steps, pd: 1.0, t2star: DEFAULT_T2STAR, b1minus: DEFAULT_B1MINUS }
    }

    fn validate(&self) -> SimResult<()> {
        if self.steps < 2 {
            return Err(SimError::InvalidTissue(format!("a T1 sweep needs at least 2 steps, got {}", self.steps)));
        }
        if !(self.t1_min > 0.0 && self.t1_min < self.t1_max && self.t1_max.is_finite()) {
            return Err(SimError::InvalidTissue(format!("T1 sweep range must satisfy 0 < min < max, got {} to {}", self.t1_min, self.t1_max)));
        }
        // checks pd, t2star, b1minus
        TissueParameters::with_all(self.t1_min,self.pd,self.t2star,self.b1minus)?;
        Ok(())
    }
}

#[derive(Clone,Debug,PartialEq,Serialize)]
pub struct SweepRow {
    #[serde(rename = "T1")]
    pub t1:f64,
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

impl fmt::Display for SweepRow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error {
            Some(e) => write!(f, "{:>10.1}  error: {}", self.t1, e),
            None => write!(f, "{:>10.1}{:>12.6}{:>12.6}{:>12.6}{:>12.6}",
                self.t1,
                self.mzss.unwrap_or(f64::NAN),
                self.inv1.unwrap_or(f64::NAN),
                self.inv2.unwrap_or(f64::NAN),
                self.uni.unwrap_or(f64::NAN)),
        }
    }
}

pub fn t1_sweep(sim:&Mp2rageSimulator,spec:&SweepSpec) -> SimResult<Vec<SweepRow>> {
    spec.validate()?;
    let t1s = utils::linspace(spec.t1_min,spec.t1_max,spec.steps);
    Ok(t1s.par_iter().map(|&t1| {
        let tissue = TissueParameters { t1, pd: spec.pd, t2star: spec.t2star, b1minus: spec.b1minus };
        match sim.simulate(&tissue) {
            Ok(r) => SweepRow { t1, mzss: Some(r.mzss), inv1: Some(r.inv1), inv2: Some(r.inv2), uni: Some(r.uni), error: None },
            Err(e) => SweepRow { t1, mzss: None, inv1: None, inv2: None, uni: None, error: Some(e.to_string()) },
        }
    }).collect())
}
