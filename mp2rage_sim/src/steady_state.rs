use crate::error::{checked_denominator, SimError, SimResult};
use crate::protocol::Protocol;
use crate::timing::DerivedTiming;

/// Inversion efficiency. Inversions are assumed perfect.
pub const INVERSION_EFFICIENCY:f64 = 1.0;

/// Relaxation terms of one tissue under one protocol. Shared between the
/// steady state solution and signal formation.
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct Intermediates {
    /// exp(-TA/T1)
    pub ea:f64,
    /// exp(-TB/T1)
    pub eb:f64,
    /// exp(-TC/T1)
    pub ec:f64,
    /// exp(-TR_GRE/T1)
    pub e1:f64,
    /// cos(alpha1)*E1
    pub c1:f64,
    /// cos(alpha2)*E1
    pub c2:f64,
}

impl Intermediates {
    pub fn new(t1:f64,protocol:&Protocol,timing:&DerivedTiming) -> Self {
        let e1 = (-protocol.tr_gre / t1).exp();
        Self {
            ea: (-timing.ta / t1).exp(),
            eb: (-timing.tb / t1).exp(),
            ec: (-timing.tc / t1).exp(),
            e1,
            c1: protocol.alpha1_rad().cos() * e1,
            c2: protocol.alpha2_rad().cos() * e1,
        }
    }
}

/// Longitudinal magnetization after a train of `n` excitations entered
/// with `m_in`. Closed form of the geometric series with ratio `c`.
fn gre_train(m_in:f64,c:f64,e1:f64,n:f64) -> SimResult<f64> {
    let cn = c.powf(n);
    let one_minus_c = checked_denominator("1 - cos(alpha)*E1", 1.0 - c)?;
    Ok(m_in * cn + (1.0 - e1) * ((1.0 - cn) / one_minus_c))
}

/// Cyclic steady state magnetization before the first inversion of each
/// TR_MP2RAGE period, together with the relaxation terms used to get it.
pub fn steady_state(t1:f64,pd:f64,protocol:&Protocol,timing:&DerivedTiming) -> SimResult<(f64,Intermediates)> {
    if !(t1 > 0.0) {
        return Err(SimError::InvalidTissue(format!("T1 must be positive, got {}", t1)));
    }
    let im = Intermediates::new(t1,protocol,timing);
    let n = f64::from(protocol.n);

    // first train, entered after TA of recovery from inversion
    let after_first = gre_train(1.0 - im.ea, im.c1, im.e1, n)?;
    // TB of free recovery, then the second train
    let before_second = after_first * im.eb + (1.0 - im.eb);
    let after_second = gre_train(before_second, im.c2, im.e1, n)?;
    // TC of free recovery up to the next inversion
    let numerator = after_second * pd * im.ec + (1.0 - im.ec) * pd;

    let flip_loss = (protocol.alpha1_rad().cos() * protocol.alpha2_rad().cos()).powf(n);
    let denominator = 1.0 + INVERSION_EFFICIENCY * flip_loss * (-protocol.tr_mp2rage / t1).exp();
    let denominator = checked_denominator("steady state normalization", denominator)?;

    Ok((numerator / denominator, im))
}
