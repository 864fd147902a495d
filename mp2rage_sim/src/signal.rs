use std::fmt;
use crate::error::{checked_denominator, SimError, SimResult};
use crate::protocol::Protocol;
use crate::steady_state::{Intermediates, INVERSION_EFFICIENCY};
use crate::tissue::TissueParameters;

/// Simulated acquisition for one tissue. INV1 and INV2 keep the sign the
/// signal equations give them.
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct SignalResult {
    pub mzss:f64,
    pub inv1:f64,
    pub inv2:f64,
    pub uni:f64,
}

impl fmt::Display for SignalResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Mzss:{:.6} INV1:{:.6} INV2:{:.6} UNI:{:.6}", self.mzss, self.inv1, self.inv2, self.uni)
    }
}

/// INV1 and INV2 sampled at the center of each GRE train, i.e. n/3 and
/// 2n/3 excitations into the first and second train.
pub fn form_signals(tissue:&TissueParameters,protocol:&Protocol,mzss:f64,im:&Intermediates) -> SimResult<(f64,f64)> {
    let n = f64::from(protocol.n);
    let (a1, a2) = (protocol.alpha1_rad(), protocol.alpha2_rad());
    let decay = (-protocol.te / tissue.t2star).exp();
    let m_rel = mzss / tissue.pd;

    let train1 = checked_denominator("1 - cos(alpha1)*E1", 1.0 - a1.cos() * im.e1)?;
    let train2 = checked_denominator("1 - cos(alpha2)*E1", 1.0 - a2.cos() * im.e1)?;
    let ec = checked_denominator("EC", im.ec)?;
    let c2 = checked_denominator("cos(alpha2)*E1", im.c2)?;

    let c1_center = im.c1.powf(n / 3.0);
    let inv1_mz = (-INVERSION_EFFICIENCY * m_rel * im.ea + (1.0 - im.ea)) * c1_center
        + (1.0 - im.e1) * (1.0 - c1_center) / train1;

    // second train is run backwards from the steady state at TC
    let c2_center = c2.powf(2.0 * n / 3.0);
    let c2_back = c2.powf(-2.0 * n / 3.0 - 1.0);
    let inv2_mz = (m_rel - (1.0 - im.ec)) / ec * c2_center
        - (1.0 - im.e1) * c2_back / train2;

    let inv1 = tissue.pd * tissue.b1minus * decay * a1.sin() * inv1_mz;
    let inv2 = tissue.pd * tissue.b1minus * decay * a2.sin() * inv2_mz;

    if !inv1.is_finite() {
        return Err(SimError::DegenerateDenominator { term: "INV1", value: inv1 });
    }
    if !inv2.is_finite() {
        return Err(SimError::DegenerateDenominator { term: "INV2", value: inv2 });
    }
    Ok((inv1, inv2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::steady_state::steady_state;
    use crate::timing::derive_timing;

    fn signals(tissue:&TissueParameters,protocol:&Protocol) -> SimResult<(f64,f64)> {
        let t = derive_timing(protocol);
        let (m, im) = steady_state(tissue.t1,tissue.pd,protocol,&t)?;
        form_signals(tissue,protocol,m,&im)
    }

    #[test]
    fn receive_field_scales_both_signals(){
        let p = Protocol::default();
        let a = signals(&TissueParameters::with_all(1500.0,0.9,50.0,1.0).unwrap(),&p).unwrap();
        let b = signals(&TissueParameters::with_all(1500.0,0.9,50.0,0.5).unwrap(),&p).unwrap();
        assert!((a.0 - 2.0 * b.0).abs() < 1e-15);
        assert!((a.1 - 2.0 * b.1).abs() < 1e-15);
    }

    #[test]
    fn no_t2star_decay_ignores_te(){
        let mut p = Protocol::default();
        let t = TissueParameters::with_all(1500.0,0.9,f64::INFINITY,1.0).unwrap();
        let a = signals(&t,&p).unwrap();
        p.te = 0.0;
        let b = signals(&t,&p).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn te_decay_matches_t2star(){
        let mut p = Protocol::default();
        let t = TissueParameters::with_all(1500.0,0.9,50.0,1.0).unwrap();
        let a = signals(&t,&p).unwrap();
        p.te = 0.0;
        let b = signals(&t,&p).unwrap();
        let decay = (-3.0f64 / 50.0).exp();
        assert!((a.0 - b.0 * decay).abs() <= 1e-12 * b.0.abs());
        assert!((a.1 - b.1 * decay).abs() <= 1e-12 * b.1.abs());
    }

    #[test]
    fn vanishing_ec_is_degenerate(){
        let p = Protocol::default();
        // exp(-2980/1) underflows to zero
        let t = TissueParameters::new(1.0,0.9).unwrap();
        match signals(&t,&p) {
            Err(SimError::DegenerateDenominator { term, value }) => {
                assert_eq!(term, "EC");
                assert_eq!(value, 0.0);
            }
            other => panic!("expected EC to be degenerate, got {:?}", other),
        }
    }

    #[test]
    fn ninety_degree_second_flip_is_degenerate(){
        let mut p = Protocol::default();
        p.alpha2 = 90.0;
        let t = TissueParameters::new(1500.0,0.9).unwrap();
        // cos(90deg) is not exactly zero in floating point, c2^(-2n/3-1) blows up
        assert!(matches!(signals(&t,&p), Err(SimError::DegenerateDenominator { .. })));
    }
}
