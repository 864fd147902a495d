use log::info;
use crate::protocol::Protocol;

/// Free-relaxation intervals of one TR_MP2RAGE period.
/// TA and TB run from an inversion (or the end of the first train) to the
/// start of a GRE train, TC from the end of the second train to the next
/// inversion. TI1 and TI2 are measured to the train centers.
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct DerivedTiming {
    pub ta:f64,
    pub tb:f64,
    pub tc:f64,
}

impl DerivedTiming {
    pub fn new(protocol:&Protocol) -> Self {
        let ro = protocol.readout_duration();
        Self {
            ta: protocol.ti1 - ro / 2.0,
            tb: protocol.ti2 - protocol.ti1 - ro,
            tc: protocol.tr_mp2rage - (protocol.ti2 + ro / 2.0),
        }
    }

    /// TA + train + TB + train + TC, which closes to TR_MP2RAGE
    pub fn period(&self,protocol:&Protocol) -> f64 {
        let ro = protocol.readout_duration();
        self.ta + ro + self.tb + ro + self.tc
    }

    pub fn negative_intervals(&self) -> Vec<&'static str> {
        [("TA", self.ta), ("TB", self.tb), ("TC", self.tc)]
            .iter()
            .filter(|(_, t)| *t < 0.0)
            .map(|(name, _)| *name)
            .collect()
    }
}

pub fn derive_timing(protocol:&Protocol) -> DerivedTiming {
    DerivedTiming::new(protocol)
}

/// Receives the timing summary once per simulator construction.
pub trait TimingObserver {
    fn timing_derived(&self,protocol:&Protocol,timing:&DerivedTiming);
}

/// Writes the timing summary to the `info` log
pub struct LogObserver;

impl TimingObserver for LogObserver {
    fn timing_derived(&self, protocol: &Protocol, timing: &DerivedTiming) {
        info!("MP2RAGE simulator initialized:");
        info!("  GRE blocks: {} excitations x {}ms = {}ms each", protocol.n, protocol.tr_gre, protocol.readout_duration());
        info!("  Timing: TA={:.0}ms, TB={:.0}ms, TC={:.0}ms", timing.ta, timing.tb, timing.tc);
    }
}

pub struct NullObserver;

impl TimingObserver for NullObserver {
    fn timing_derived(&self, _protocol: &Protocol, _timing: &DerivedTiming) {}
}

pub fn derive_timing_observed(protocol:&Protocol,observer:&dyn TimingObserver) -> DerivedTiming {
    let timing = derive_timing(protocol);
    observer.timing_derived(protocol,&timing);
    timing
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use super::*;
    use crate::config::Config;

    #[test]
    fn default_protocol_intervals(){
        let t = derive_timing(&Protocol::default());
        assert_eq!(t.ta, 180.0);
        assert_eq!(t.tb, 760.0);
        assert_eq!(t.tc, 2980.0);
        assert!(t.negative_intervals().is_empty());
    }

    #[test]
    fn intervals_close_the_period(){
        let p = Protocol::new(8250.0,1000.0,3300.0,5.0,3.0,7.1,176,2.8).unwrap();
        let t = derive_timing(&p);
        assert!((t.period(&p) - p.tr_mp2rage).abs() < 1e-9);
    }

    #[test]
    fn negative_intervals_are_not_errors(){
        let p = Protocol::new(6000.0,700.0,2500.0,4.0,5.0,10.0,200,3.0).unwrap();
        let t = derive_timing(&p);
        assert_eq!(t.ta, -300.0);
        assert_eq!(t.negative_intervals(), vec!["TA","TB"]);
    }

    struct Recorder {
        seen:RefCell<Vec<DerivedTiming>>,
    }

    impl TimingObserver for Recorder {
        fn timing_derived(&self, _protocol: &Protocol, timing: &DerivedTiming) {
            self.seen.borrow_mut().push(*timing);
        }
    }

    #[test]
    fn observer_sees_derived_timing(){
        let r = Recorder{seen:RefCell::new(vec![])};
        let p = Protocol::default();
        let t = derive_timing_observed(&p,&r);
        assert_eq!(r.seen.borrow().as_slice(), &[t]);
    }
}
