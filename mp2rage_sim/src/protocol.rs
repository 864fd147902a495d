use crate::config::Config;
use crate::error::{SimError, SimResult};

/*
    An MP2RAGE protocol is one TR_MP2RAGE period containing two inversion
    blocks. Each block is a train of n small flip angle GRE excitations
    centered on its inversion time:

    |inv|--TA--|== n*TR_GRE ==|----TB----|== n*TR_GRE ==|------TC------|
    0         TI1 (center)                TI2 (center)          TR_MP2RAGE
 */

/// Sequence timing and flip angles. Durations are in ms, flip angles in degrees.
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct Protocol {
    pub tr_mp2rage:f64,
    pub ti1:f64,
    pub ti2:f64,
    pub alpha1:f64,
    pub alpha2:f64,
    pub tr_gre:f64,
    pub n:u32,
    pub te:f64,
}

impl Config for Protocol {
    fn default() -> Self {
        Self {
            tr_mp2rage: 6000.0,
            ti1: 700.0,
            ti2: 2500.0,
            alpha1: 4.0,
            alpha2: 5.0,
            tr_gre: 6.5,
            n: 160,
            te: 3.0,
        }
    }
}

impl Protocol {
    #[allow(clippy::too_many_arguments)]
    pub fn new(tr_mp2rage:f64,ti1:f64,ti2:f64,alpha1:f64,alpha2:f64,tr_gre:f64,n:u32,te:f64) -> SimResult<Self> {
        let p = Self { tr_mp2rage, ti1, ti2, alpha1, alpha2, tr_gre, n, te };
        p.validate()?;
        Ok(p)
    }

    /// Checks field ranges and inversion ordering. Readout fit is reported
    /// separately by `timing_violations`.
    pub fn validate(&self) -> SimResult<()> {
        let fields = [
            ("TR_MP2RAGE", self.tr_mp2rage),
            ("TI1", self.ti1),
            ("TI2", self.ti2),
            ("alpha1", self.alpha1),
            ("alpha2", self.alpha2),
            ("TR_GRE", self.tr_gre),
            ("TE", self.te),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{} must be finite, got {}", name, value)));
        }
        if self.tr_mp2rage <= 0.0 {
            return Err(invalid(format!("TR_MP2RAGE must be positive, got {}", self.tr_mp2rage)));
        }
        if self.tr_gre <= 0.0 {
            return Err(invalid(format!("TR_GRE must be positive, got {}", self.tr_gre)));
        }
        if self.n == 0 {
            return Err(invalid("n must be at least one excitation".to_string()));
        }
        if self.ti1 <= 0.0 {
            return Err(invalid(format!("TI1 must be positive, got {}", self.ti1)));
        }
        if self.ti1 >= self.ti2 {
            return Err(invalid(format!("TI1 ({}) must be less than TI2 ({})", self.ti1, self.ti2)));
        }
        if self.ti2 >= self.tr_mp2rage {
            return Err(invalid(format!("TI2 ({}) must be less than TR_MP2RAGE ({})", self.ti2, self.tr_mp2rage)));
        }
        if self.te < 0.0 {
            return Err(invalid(format!("TE must not be negative, got {}", self.te)));
        }
        for (name, alpha) in [("alpha1", self.alpha1), ("alpha2", self.alpha2)] {
            if alpha <= 0.0 || alpha > 90.0 {
                return Err(invalid(format!("{} must be in (0, 90] degrees, got {}", name, alpha)));
            }
        }
        Ok(())
    }

    /// Duration of one GRE excitation train
    pub fn readout_duration(&self) -> f64 {
        f64::from(self.n) * self.tr_gre
    }

    /// Conditions under which one of TA, TB or TC goes negative, i.e. the
    /// readout trains do not fit between the inversions.
    pub fn timing_violations(&self) -> Vec<String> {
        let ro = self.readout_duration();
        let mut violations = Vec::<String>::new();
        if ro > 2.0 * self.ti1 {
            violations.push(format!("n*TR_GRE ({}) exceeds 2*TI1 ({})", ro, 2.0 * self.ti1));
        }
        if ro > self.ti2 - self.ti1 {
            violations.push(format!("n*TR_GRE ({}) exceeds TI2-TI1 ({})", ro, self.ti2 - self.ti1));
        }
        if self.ti2 + ro / 2.0 > self.tr_mp2rage {
            violations.push(format!("second readout ends at {} after TR_MP2RAGE ({})", self.ti2 + ro / 2.0, self.tr_mp2rage));
        }
        violations
    }

    pub fn alpha1_rad(&self) -> f64 {
        self.alpha1.to_radians()
    }

    pub fn alpha2_rad(&self) -> f64 {
        self.alpha2.to_radians()
    }
}

fn invalid(msg:String) -> SimError {
    SimError::InvalidProtocol(msg)
}

#[test]
fn default_protocol_is_valid(){
    let p = Protocol::default();
    p.validate().unwrap();
    assert!(p.timing_violations().is_empty());
    assert_eq!(p.readout_duration(), 1040.0);
}

#[test]
fn inversion_ordering_is_enforced(){
    let e = Protocol::new(6000.0,2500.0,700.0,4.0,5.0,6.5,160,3.0);
    assert!(matches!(e, Err(SimError::InvalidProtocol(_))));
    let e = Protocol::new(6000.0,700.0,700.0,4.0,5.0,6.5,160,3.0);
    assert!(matches!(e, Err(SimError::InvalidProtocol(_))));
    let e = Protocol::new(2500.0,700.0,2500.0,4.0,5.0,6.5,160,3.0);
    assert!(matches!(e, Err(SimError::InvalidProtocol(_))));
}

#[test]
fn non_positive_durations_are_rejected(){
    assert!(Protocol::new(6000.0,700.0,2500.0,4.0,5.0,0.0,160,3.0).is_err());
    assert!(Protocol::new(0.0,700.0,2500.0,4.0,5.0,6.5,160,3.0).is_err());
    assert!(Protocol::new(6000.0,700.0,2500.0,4.0,5.0,6.5,0,3.0).is_err());
    assert!(Protocol::new(6000.0,700.0,2500.0,4.0,5.0,6.5,160,-1.0).is_err());
    assert!(Protocol::new(6000.0,700.0,2500.0,0.0,5.0,6.5,160,3.0).is_err());
    assert!(Protocol::new(6000.0,f64::NAN,2500.0,4.0,5.0,6.5,160,3.0).is_err());
}

#[test]
fn oversized_readout_is_reported_not_rejected(){
    // 200 * 10ms trains do not fit inside TI1 = 700
    let p = Protocol::new(6000.0,700.0,2500.0,4.0,5.0,10.0,200,3.0).unwrap();
    let v = p.timing_violations();
    assert_eq!(v.len(), 2);
    assert!(v[0].contains("2*TI1"));
}

#[test]
fn obtuse_flip_angles_are_rejected(){
    // cos(alpha) < 0 would raise a negative base to n/3 and 2n/3
    let e = Protocol::new(6000.0,700.0,2500.0,4.0,120.0,6.5,160,3.0);
    assert!(matches!(e, Err(SimError::InvalidProtocol(_))));
    let e = Protocol::new(6000.0,700.0,2500.0,91.0,5.0,6.5,160,3.0);
    assert!(matches!(e, Err(SimError::InvalidProtocol(_))));
    assert!(Protocol::new(6000.0,700.0,2500.0,90.0,90.0,6.5,160,3.0).is_ok());
}
