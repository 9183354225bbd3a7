//! Integration tests for the `validate` command.
use gridsize::cli::handle_validate_command;
use gridsize::input::load_model;
use gridsize::log::is_logger_initialised;
use gridsize::settings::Settings;
use std::fs;
use tempfile::tempdir;

mod common;
use common::write_synthetic_model;

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_validate_command() {
    unsafe { std::env::set_var("GRIDSIZE_LOG_LEVEL", "off") };

    let dir = tempdir().unwrap();
    let (data_file, parameters_file) = write_synthetic_model(dir.path());

    assert!(!is_logger_initialised());

    handle_validate_command(
        &data_file,
        Some(&parameters_file),
        Some(Settings::default()),
    )
    .unwrap();

    assert!(is_logger_initialised());
}

/// Invalid data files are reported with the file they came from.
#[test]
fn test_load_model_missing_hour() {
    let dir = tempdir().unwrap();
    let (data_file, parameters_file) = write_synthetic_model(dir.path());

    // Keep the header and the first nine hours only
    let contents = fs::read_to_string(&data_file).unwrap();
    let truncated = contents.lines().take(10).collect::<Vec<_>>().join("\n");
    fs::write(&data_file, truncated).unwrap();

    let err = load_model(&data_file, Some(&parameters_file)).unwrap_err();
    assert!(err.to_string().contains("synthetic.csv"));
    assert!(
        err.chain()
            .any(|cause| cause.to_string() == "Missing row for hour 9")
    );
}
