use std::fmt;
use crate::error::{SimError, SimResult};

/// T2* used when a tissue does not specify one (typical WM/GM at 7T)
pub const DEFAULT_T2STAR:f64 = 30.0;
/// Ideal receive field
pub const DEFAULT_B1MINUS:f64 = 1.0;

#[derive(Clone,Copy,Debug,PartialEq)]
pub struct TissueParameters {
    pub t1:f64,
    pub pd:f64,
    pub t2star:f64,
    pub b1minus:f64,
}

impl TissueParameters {
    /// Tissue with default T2* and receive field
    pub fn new(t1:f64,pd:f64) -> SimResult<Self> {
        Self::with_all(t1,pd,DEFAULT_T2STAR,DEFAULT_B1MINUS)
    }

    pub fn with_all(t1:f64,pd:f64,t2star:f64,b1minus:f64) -> SimResult<Self> {
        let t = Self { t1, pd, t2star, b1minus };
        t.validate()?;
        Ok(t)
    }

    pub fn validate(&self) -> SimResult<()> {
        for (name, value) in [("T1", self.t1), ("PD", self.pd)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SimError::InvalidTissue(format!("{} must be positive and finite, got {}", name, value)));
            }
        }
        // an infinite T2* means no transverse decay
        if !(self.t2star > 0.0) {
            return Err(SimError::InvalidTissue(format!("T2star must be positive, got {}", self.t2star)));
        }
        if !(self.b1minus >= 0.0) || !self.b1minus.is_finite() {
            return Err(SimError::InvalidTissue(format!("B1minus must be non-negative, got {}", self.b1minus)));
        }
        Ok(())
    }
}

impl fmt::Display for TissueParameters {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "T1:{} PD:{} T2star:{} B1minus:{}", self.t1, self.pd, self.t2star, self.b1minus)
    }
}

/// A tissue as it appears in a simulation batch
#[derive(Clone,Debug,PartialEq)]
pub struct NamedTissue {
    pub name:String,
    pub params:TissueParameters,
}

impl NamedTissue {
    pub fn new(name:&str,params:TissueParameters) -> Self {
        Self { name: name.to_string(), params }
    }
}

#[test]
fn defaults_are_applied(){
    let t = TissueParameters::new(1500.0,0.9).unwrap();
    assert_eq!(t.t2star, 30.0);
    assert_eq!(t.b1minus, 1.0);
}

#[test]
fn invalid_tissues_are_rejected(){
    assert!(matches!(TissueParameters::new(0.0,0.9), Err(SimError::InvalidTissue(_))));
    assert!(matches!(TissueParameters::new(1500.0,-0.1), Err(SimError::InvalidTissue(_))));
    assert!(TissueParameters::with_all(1500.0,0.9,0.0,1.0).is_err());
    assert!(TissueParameters::with_all(1500.0,0.9,30.0,-1.0).is_err());
    assert!(TissueParameters::new(f64::NAN,0.9).is_err());
    assert!(TissueParameters::new(f64::INFINITY,0.9).is_err());
}

#[test]
fn unbounded_t2star_is_allowed(){
    // no T2* decay at all
    assert!(TissueParameters::with_all(1500.0,0.9,f64::INFINITY,1.0).is_ok());
}
