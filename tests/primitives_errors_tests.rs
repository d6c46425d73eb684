#![cfg(feature = "dev")]

use uqstat::internals::primitives::errors::UqError;

#[test]
fn test_uq_error_display() {
    // EmptyInput
    let err = UqError::EmptyInput;
    assert_eq!(format!("{}", err), "Input is empty");

    // InvalidArgument
    let err = UqError::InvalidArgument("test error".to_string());
    assert_eq!(format!("{}", err), "Invalid argument: test error");

    // DimensionMismatch
    let err = UqError::DimensionMismatch {
        expected: 3,
        got: 2,
    };
    assert_eq!(format!("{}", err), "Dimension mismatch: expected 3, got 2");

    // MismatchedInputs
    let err = UqError::MismatchedInputs {
        design_rows: 10,
        observations: 5,
    };
    assert_eq!(
        format!("{}", err),
        "Length mismatch: design has 10 rows, observations have 5 values"
    );

    // InvalidFoldCount
    let err = UqError::InvalidFoldCount {
        k: 13,
        sample_size: 13,
    };
    assert_eq!(
        format!("{}", err),
        "Invalid fold count: 13 (must be in [2, 13))"
    );

    // InvalidHalfMaximumSize
    let err = UqError::InvalidHalfMaximumSize(0);
    assert_eq!(
        format!("{}", err),
        "Invalid half maximum size: 0 (must be at least 1)"
    );

    // NotDefined
    let err = UqError::NotDefined {
        statistic: "kurtosis",
        got: 3,
        min: 4,
    };
    assert_eq!(
        format!("{}", err),
        "kurtosis is not defined: got 3 points, need at least 4"
    );

    // SingularSystem
    let err = UqError::SingularSystem("rank-deficient 4 x 3 design".to_string());
    assert_eq!(
        format!("{}", err),
        "Singular system: rank-deficient 4 x 3 design"
    );

    // InternalError
    let err = UqError::InternalError("oops".to_string());
    assert_eq!(format!("{}", err), "Internal error: oops");

    // FoldFailed
    let err = UqError::FoldFailed {
        fold: 2,
        reason: "Singular system: x".to_string(),
    };
    assert_eq!(format!("{}", err), "Fold 2 failed: Singular system: x");

    // DuplicateParameter
    let err = UqError::DuplicateParameter { parameter: "seed" };
    assert_eq!(
        format!("{}", err),
        "Parameter 'seed' was set multiple times. Each parameter can only be configured once."
    );
}

#[test]
fn test_invalid_argument_family() {
    assert!(UqError::EmptyInput.is_invalid_argument());
    assert!(UqError::InvalidFoldCount {
        k: 1,
        sample_size: 10
    }
    .is_invalid_argument());
    assert!(UqError::InvalidHalfMaximumSize(0).is_invalid_argument());
    assert!(UqError::DimensionMismatch {
        expected: 1,
        got: 2
    }
    .is_invalid_argument());

    assert!(!UqError::SingularSystem("s".into()).is_invalid_argument());
    assert!(!UqError::NotDefined {
        statistic: "mean",
        got: 0,
        min: 1
    }
    .is_invalid_argument());
    assert!(!UqError::FoldFailed {
        fold: 0,
        reason: String::new()
    }
    .is_invalid_argument());
}

#[test]
#[cfg(feature = "std")]
fn test_std_error_trait() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    let err = UqError::EmptyInput;
    assert_error(&err);
    let boxed: Box<dyn std::error::Error> = Box::new(err.clone());
    assert_eq!(boxed.to_string(), "Input is empty");
}

#[test]
fn test_error_clone_and_eq() {
    let err = UqError::InvalidArgument("a".into());
    assert_eq!(err.clone(), err);
    assert_ne!(err, UqError::InvalidArgument("b".into()));
}
