use log::{debug, warn};
use rayon::prelude::*;
use crate::contrast::compose_uni;
use crate::error::{SimError, SimResult};
use crate::protocol::Protocol;
use crate::signal::{form_signals, SignalResult};
use crate::steady_state::{steady_state, Intermediates};
use crate::timing::{derive_timing_observed, DerivedTiming, LogObserver, TimingObserver};
use crate::tissue::{NamedTissue, TissueParameters};

/// Forward model for one protocol. Timing is derived once at construction
/// and every tissue is simulated independently against it.
#[derive(Clone,Debug)]
pub struct Mp2rageSimulator {
    protocol:Protocol,
    timing:DerivedTiming,
}

/// Per-tissue entry of a batch run
#[derive(Debug)]
pub struct TissueOutcome {
    pub name:String,
    pub tissue:TissueParameters,
    pub result:SimResult<SignalResult>,
}

impl Mp2rageSimulator {
    pub fn new(protocol:Protocol) -> SimResult<Self> {
        Self::with_observer(protocol,&LogObserver,false)
    }

    /// Like `new`, but a readout that does not fit between the inversions
    /// is an error instead of a warning.
    pub fn strict(protocol:Protocol) -> SimResult<Self> {
        Self::with_observer(protocol,&LogObserver,true)
    }

    pub fn with_observer(protocol:Protocol,observer:&dyn TimingObserver,strict_timing:bool) -> SimResult<Self> {
        protocol.validate()?;
        let violations = protocol.timing_violations();
        if strict_timing && !violations.is_empty() {
            return Err(SimError::InvalidProtocol(violations.join("; ")));
        }
        for v in &violations {
            warn!("readout does not fit: {}", v);
        }
        let timing = derive_timing_observed(&protocol,observer);
        let negative = timing.negative_intervals();
        if !negative.is_empty() {
            warn!("negative relaxation interval(s): {}", negative.join(", "));
        }
        Ok(Self { protocol, timing })
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    pub fn timing(&self) -> &DerivedTiming {
        &self.timing
    }

    pub fn steady_state(&self,t1:f64,pd:f64) -> SimResult<(f64,Intermediates)> {
        steady_state(t1,pd,&self.protocol,&self.timing)
    }

    pub fn simulate(&self,tissue:&TissueParameters) -> SimResult<SignalResult> {
        tissue.validate()?;
        let (mzss, im) = self.steady_state(tissue.t1,tissue.pd)?;
        let (inv1, inv2) = form_signals(tissue,&self.protocol,mzss,&im)?;
        let uni = compose_uni(inv1,inv2);
        debug!("simulated {}: Mzss={} INV1={} INV2={} UNI={}", tissue, mzss, inv1, inv2, uni);
        Ok(SignalResult { mzss, inv1, inv2, uni })
    }

    /// Simulates all tissues in parallel. Output order follows input order;
    /// a failing tissue is reported in its own outcome only.
    pub fn simulate_batch(&self,tissues:&[NamedTissue]) -> Vec<TissueOutcome> {
        tissues.par_iter().map(|t| {
            let result = self.simulate(&t.params);
            if let Err(e) = &result {
                warn!("tissue {} failed: {}", t.name, e);
            }
            TissueOutcome { name: t.name.clone(), tissue: t.params, result }
        }).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::timing::NullObserver;

    fn quiet() -> Mp2rageSimulator {
        Mp2rageSimulator::with_observer(Protocol::default(),&NullObserver,false).unwrap()
    }

    #[test]
    fn invalid_protocol_fails_at_construction(){
        let mut p = Protocol::default();
        p.ti2 = 6500.0;
        assert!(matches!(Mp2rageSimulator::new(p), Err(SimError::InvalidProtocol(_))));
    }

    #[test]
    fn strict_rejects_overlapping_readout(){
        let p = Protocol::new(6000.0,700.0,2500.0,4.0,5.0,10.0,200,3.0).unwrap();
        assert!(Mp2rageSimulator::new(p).is_ok());
        assert!(matches!(Mp2rageSimulator::strict(p), Err(SimError::InvalidProtocol(_))));
    }

    #[test]
    fn batch_isolates_failures(){
        let sim = quiet();
        let good = TissueParameters::new(1500.0,0.9).unwrap();
        let bad = TissueParameters { t1: 1500.0, pd: -1.0, t2star: 30.0, b1minus: 1.0 };
        let short = TissueParameters::new(1.0,0.9).unwrap();
        let out = sim.simulate_batch(&[
            NamedTissue::new("good",good),
            NamedTissue::new("bad",bad),
            NamedTissue::new("short",short),
            NamedTissue::new("good again",good),
        ]);
        assert_eq!(out.len(), 4);
        assert_eq!(out[1].name, "bad");
        assert!(matches!(out[1].result, Err(SimError::InvalidTissue(_))));
        assert!(matches!(out[2].result, Err(SimError::DegenerateDenominator { .. })));
        assert_eq!(out[0].result.as_ref().unwrap(), out[3].result.as_ref().unwrap());
    }

    #[test]
    fn uni_uses_the_plain_ratio(){
        let sim = quiet();
        let r = sim.simulate(&TissueParameters::new(1500.0,0.9).unwrap()).unwrap();
        assert_eq!(r.uni, compose_uni(r.inv1,r.inv2));
    }

    #[test]
    fn obtuse_flip_angle_fails_before_any_tissue(){
        let mut p = Protocol::default();
        p.alpha2 = 120.0;
        let e = Mp2rageSimulator::with_observer(p,&NullObserver,false);
        assert!(matches!(e, Err(SimError::InvalidProtocol(_))));
    }
}
