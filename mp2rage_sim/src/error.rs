use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid protocol: {0}")]
    InvalidProtocol(String),

    #[error("invalid tissue: {0}")]
    InvalidTissue(String),

    #[error("degenerate denominator in {term} (value {value})")]
    DegenerateDenominator { term: &'static str, value: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SimResult<T> = Result<T, SimError>;

/// Passes `value` through unless it is zero or not finite.
pub(crate) fn checked_denominator(term:&'static str, value:f64) -> SimResult<f64> {
    if value == 0.0 || !value.is_finite() {
        return Err(SimError::DegenerateDenominator { term, value });
    }
    Ok(value)
}

#[test]
fn zero_denominator_is_rejected(){
    match checked_denominator("EC", 0.0) {
        Err(SimError::DegenerateDenominator { term, .. }) => assert_eq!(term, "EC"),
        other => panic!("expected degenerate denominator, got {:?}", other),
    }
    assert!(checked_denominator("EC", f64::NAN).is_err());
    assert!(checked_denominator("EC", f64::INFINITY).is_err());
    assert_eq!(checked_denominator("EC", -0.25).unwrap(), -0.25);
}
