use buzz_stream_stall_monitor::{monitor, Config, Summary};
use clap::Parser;
use std::io::Write;
use tempfile::NamedTempFile;

fn config_for(file: &NamedTempFile, extra: &[&str]) -> Config {
    let path = file.path().to_string_lossy().to_string();
    let mut argv = vec!["monitor".to_string(), "--file".to_string(), path];
    argv.extend(extra.iter().map(|s| s.to_string()));
    Config::try_parse_from(argv).unwrap()
}

#[test]
fn test_monitor_local_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "time,temperature").unwrap();
    writeln!(file, "2024-06-01 10:00, 98.6").unwrap();
    writeln!(file, "2024-06-01 11:00, 151.0").unwrap();
    writeln!(file, "2024-06-01 12:00, 165.2").unwrap();
    writeln!(file, "2024-06-01 13:00, 203.0").unwrap();
    file.flush().unwrap();

    let summary = monitor(&config_for(&file, &[])).unwrap();
    assert_eq!(
        summary,
        Summary {
            rows: 4,
            stalled: 2
        }
    );
}

#[test]
fn test_monitor_custom_range() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "time,temperature\n1,150\n2,160\n3,175").unwrap();
    file.flush().unwrap();

    let config = config_for(&file, &["--stall-min", "155", "--stall-max", "170"]);
    let summary = monitor(&config).unwrap();
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.stalled, 1);
}

#[test]
fn test_monitor_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.csv");
    let config = Config::try_parse_from(["monitor", "--file", path.to_str().unwrap()]).unwrap();

    let err = monitor(&config).unwrap_err();
    assert!(err.to_string().contains("Failed to open CSV file"), "{err}");
}
