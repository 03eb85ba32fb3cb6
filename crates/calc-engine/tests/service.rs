//! Integration tests for operation dispatch and batch evaluation.

use calc_engine::config::{EngineConfig, RSquaredPolicy, VarianceConvention};
use calc_engine::service::{
    BasicOperation, CalcRequest, CalcResponse, Calculator, ErrorBody, MatrixOperation,
    StatisticalOperation,
};
use calc_engine::{CalcError, Matrix};

fn matrix_request(operation: &str, a: Vec<Vec<f64>>, b: Option<Vec<Vec<f64>>>) -> CalcRequest {
    CalcRequest::Matrix {
        operation: operation.to_string(),
        matrix_a: a,
        matrix_b: b,
    }
}

// ---------------------------------------------------------------------------
// Operation names
// ---------------------------------------------------------------------------

#[test]
fn operation_names_parse() {
    assert_eq!("ADD".parse::<BasicOperation>().unwrap(), BasicOperation::Add);
    assert_eq!(
        "std_dev".parse::<StatisticalOperation>().unwrap(),
        StatisticalOperation::StdDev
    );
    assert_eq!(
        "determinant".parse::<MatrixOperation>().unwrap(),
        MatrixOperation::Determinant
    );
    assert_eq!(StatisticalOperation::StdDev.to_string(), "std_dev");
}

#[test]
fn unknown_operation_is_typed_error() {
    let err = "modulo".parse::<BasicOperation>().unwrap_err();
    assert_eq!(
        err,
        CalcError::UnsupportedOperation {
            family: "basic",
            name: "modulo".to_string()
        }
    );
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

#[test]
fn calculator_basic_and_statistics() {
    let calc = Calculator::default();
    assert_eq!(calc.basic(BasicOperation::Power, 2.0, 10.0).unwrap(), 1024.0);
    assert_eq!(
        calc.statistics(StatisticalOperation::Median, &[3.0, 1.0, 2.0])
            .unwrap(),
        2.0
    );
}

#[test]
fn calculator_std_dev_follows_config() {
    let data = [1.0, 2.0, 3.0, 4.0, 5.0];
    let population = Calculator::default()
        .statistics(StatisticalOperation::StdDev, &data)
        .unwrap();
    let sample = Calculator::new(EngineConfig::default().with_variance(VarianceConvention::Sample))
        .statistics(StatisticalOperation::StdDev, &data)
        .unwrap();
    assert!((population - 1.4142).abs() < 1e-4);
    assert!((sample - 1.5811).abs() < 1e-4);
}

#[test]
fn calculator_regression_follows_config() {
    let calc = Calculator::new(EngineConfig::default().with_r_squared(RSquaredPolicy::PerfectFit));
    let fit = calc.regression(&[1.0, 2.0], &[4.0, 4.0]).unwrap();
    assert_eq!(fit.r_squared, 1.0);
}

#[test]
fn matrix_multiply_requires_second_operand() {
    let calc = Calculator::default();
    let a = Matrix::identity(2);
    let err = calc.matrix(MatrixOperation::Multiply, &a, None).unwrap_err();
    assert_eq!(err.kind(), "missing_operand");
}

#[test]
fn matrix_transpose_ignores_second_operand() {
    let calc = Calculator::default();
    let a = Matrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
    let out = calc
        .matrix(MatrixOperation::Transpose, &a, Some(&Matrix::identity(3)))
        .unwrap();
    assert_eq!(out.as_matrix().unwrap().shape(), (2, 1));
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn evaluate_each_request_kind() {
    let calc = Calculator::default();

    let basic = CalcRequest::Basic {
        operation: "divide".into(),
        a: 9.0,
        b: 3.0,
    };
    assert_eq!(calc.evaluate(&basic).unwrap().as_scalar(), Some(3.0));

    let stats = CalcRequest::Statistics {
        operation: "mean".into(),
        values: vec![1.0, 2.0, 3.0, 4.0, 5.0],
    };
    assert_eq!(calc.evaluate(&stats).unwrap().as_scalar(), Some(3.0));

    let product = matrix_request(
        "multiply",
        vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        Some(vec![vec![5.0, 6.0], vec![7.0, 8.0]]),
    );
    let out = calc.evaluate(&product).unwrap();
    assert_eq!(
        out.as_matrix().unwrap().to_rows(),
        vec![vec![19.0, 22.0], vec![43.0, 50.0]]
    );

    let det = matrix_request("determinant", vec![vec![1.0, 2.0], vec![3.0, 4.0]], None);
    assert_eq!(calc.evaluate(&det).unwrap().as_scalar(), Some(-2.0));

    let regression = CalcRequest::Regression {
        x: vec![1.0, 2.0, 3.0, 4.0, 5.0],
        y: vec![2.0, 4.0, 5.0, 4.0, 6.0],
    };
    let fit = calc.evaluate(&regression).unwrap();
    assert!((fit.as_regression().unwrap().slope - 0.8).abs() < 1e-9);
}

#[test]
fn evaluate_reports_ragged_matrix() {
    let calc = Calculator::default();
    let request = matrix_request("transpose", vec![vec![1.0, 2.0], vec![3.0]], None);
    assert_eq!(calc.evaluate(&request).unwrap_err().kind(), "ragged_matrix");
}

#[test]
fn evaluate_reports_unknown_operation() {
    let calc = Calculator::default();
    let request = CalcRequest::Statistics {
        operation: "mode".into(),
        values: vec![1.0],
    };
    let err = calc.evaluate(&request).unwrap_err();
    assert_eq!(err.kind(), "unsupported_operation");
    assert!(err.is_client_error());
}

#[test]
fn request_json_shape() {
    let json = r#"{"kind": "matrix", "operation": "multiply",
                   "matrix_a": [[1, 2]], "matrix_b": [[3], [4]]}"#;
    let request: CalcRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.element_count(), 4);

    let out = Calculator::default().evaluate(&request).unwrap();
    assert_eq!(serde_json::to_string(&out).unwrap(), r#"{"result":[[11.0]]}"#);

    let stats: CalcRequest =
        serde_json::from_str(r#"{"kind": "stats", "operation": "median", "values": [1, 2]}"#)
            .unwrap();
    assert!(matches!(stats, CalcRequest::Statistics { .. }));
}

#[test]
fn response_json_round_trips() {
    let responses = vec![
        CalcResponse::Scalar { result: 2.5 },
        CalcResponse::Matrix {
            result: Matrix::identity(2),
        },
    ];
    for response in responses {
        let json = serde_json::to_string(&response).unwrap();
        let back: CalcResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back, response);
    }
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

#[test]
fn batch_preserves_order_and_isolates_failures() {
    let calc = Calculator::default();
    let mut requests: Vec<CalcRequest> = (0..64)
        .map(|i| CalcRequest::Basic {
            operation: "add".into(),
            a: i as f64,
            b: 1.0,
        })
        .collect();
    requests[10] = CalcRequest::Basic {
        operation: "divide".into(),
        a: 1.0,
        b: 0.0,
    };

    let outcomes = calc.evaluate_batch(&requests);
    assert_eq!(outcomes.len(), 64);
    for (i, outcome) in outcomes.iter().enumerate() {
        if i == 10 {
            let err = outcome.as_ref().unwrap_err();
            assert_eq!(ErrorBody::from(err).kind, "division_by_zero");
        } else {
            assert_eq!(outcome.as_ref().unwrap().as_scalar(), Some(i as f64 + 1.0));
        }
    }
}
