use city_stats::cluster::Coordinator;
use city_stats::settings::{RunSettings, SettingsOverrides, Transport};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_city-stats");

fn write_partition(dir: &Path, rank: usize, contents: &str) {
    std::fs::write(dir.join(format!("measurements-{}.txt", rank)), contents)
        .expect("Failed to write partition");
}

fn run_binary(dir: &Path, args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .arg("--input-dir")
        .arg(dir)
        .arg("--output-dir")
        .arg(dir)
        .env_remove("CITY_STATS_RANK")
        .env_remove("CITY_STATS_WORKER_SETTINGS")
        .output()
        .expect("Failed to launch city-stats")
}

fn read_report(dir: &Path, workers: usize) -> String {
    std::fs::read_to_string(dir.join(format!("results-{}.txt", workers)))
        .expect("Report was not written")
}

fn settings(dir: &Path, workers: usize, transport: Transport) -> RunSettings {
    RunSettings::load(&SettingsOverrides {
        workers,
        input_dir: Some(dir.to_path_buf()),
        output_dir: Some(dir.to_path_buf()),
        transport: Some(transport),
        ..Default::default()
    })
    .expect("Settings should resolve")
}

/// Three partitions with overlapping cities and values that do not sum exactly
fn write_mixed_partitions(dir: &Path) {
    write_partition(
        dir,
        0,
        "Hamburg;12.0\nBulawayo;8.9\nPalembang;38.8\nHamburg;-3.3\n",
    );
    write_partition(
        dir,
        1,
        "St. John's;15.2\nCracow;12.6\nHamburg;0.1\nnot a reading\nBulawayo;27.1\n",
    );
    write_partition(dir, 2, "Cracow;-7.45\nSt. John's;-0.15\nPalembang;31.05\n");
}

#[test]
fn test_end_to_end_process_transport() {
    let dir = TempDir::new().unwrap();
    write_partition(dir.path(), 0, "Tokyo;10.0\n");
    write_partition(dir.path(), 1, "Tokyo;20.0\nOslo;5.0\n");

    let output = run_binary(dir.path(), &["2"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());
    assert_eq!(
        read_report(dir.path(), 2),
        "Oslo=5.0/5.0/5.0\nTokyo=10.0/15.0/20.0\n"
    );
}

#[test]
fn test_runs_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    write_mixed_partitions(dir.path());

    assert!(run_binary(dir.path(), &["3"]).status.success());
    let first = read_report(dir.path(), 3);
    assert!(run_binary(dir.path(), &["3"]).status.success());
    let second = read_report(dir.path(), 3);
    assert!(run_binary(dir.path(), &["3", "--transport", "thread"]).status.success());
    let threaded = read_report(dir.path(), 3);

    assert_eq!(first, second);
    assert_eq!(first, threaded);
    assert_eq!(first.lines().count(), 5);
}

#[test]
fn test_invalid_worker_counts_fail_without_report() {
    let dir = TempDir::new().unwrap();
    write_partition(dir.path(), 0, "Tokyo;10.0\n");

    for args in [&["0"][..], &["17"][..], &["many"][..], &[][..]] {
        let output = run_binary(dir.path(), args);
        assert_eq!(output.status.code(), Some(2), "args {:?}", args);
    }

    let written: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("results-"))
        .collect();
    assert!(written.is_empty());
}

#[test]
fn test_missing_partition_still_succeeds() {
    let dir = TempDir::new().unwrap();
    write_partition(dir.path(), 1, "Oslo;5.0\n");

    let output = run_binary(dir.path(), &["2"]);

    assert!(output.status.success());
    assert_eq!(read_report(dir.path(), 2), "Oslo=5.0/5.0/5.0\n");
}

#[test]
fn test_unwritable_output_dir_fails() {
    let dir = TempDir::new().unwrap();
    write_partition(dir.path(), 0, "Tokyo;10.0\n");
    let missing = dir.path().join("missing");

    let output = Command::new(BIN)
        .arg("1")
        .arg("--input-dir")
        .arg(dir.path())
        .arg("--output-dir")
        .arg(&missing)
        .env_remove("CITY_STATS_RANK")
        .env_remove("CITY_STATS_WORKER_SETTINGS")
        .output()
        .expect("Failed to launch city-stats");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Cannot write report"));
    assert!(!missing.exists());
}

#[test]
fn test_non_utf8_city_names_survive() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("measurements-0.txt"), b"Z\xfcrich;5.0\nOslo;1.0\n").unwrap();
    std::fs::write(dir.path().join("measurements-1.txt"), b"Z\xfcrich;7.0\n").unwrap();

    let output = run_binary(dir.path(), &["2"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report = std::fs::read(dir.path().join("results-2.txt")).unwrap();
    assert_eq!(report, b"Oslo=1.0/1.0/1.0\nZ\xfcrich=5.0/6.0/7.0\n".to_vec());
}

#[test]
fn test_idle_ranks_join_the_collective() {
    let dir = TempDir::new().unwrap();
    write_partition(dir.path(), 0, "Tokyo;10.0\n");
    write_partition(dir.path(), 1, "Tokyo;20.0\nOslo;5.0\n");
    // Never read: only two partitions are requested
    write_partition(dir.path(), 2, "Lima;30.0\n");

    let output = run_binary(dir.path(), &["2", "--processes", "4"]);

    assert!(output.status.success());
    assert_eq!(
        read_report(dir.path(), 2),
        "Oslo=5.0/5.0/5.0\nTokyo=10.0/15.0/20.0\n"
    );
}

#[tokio::test]
async fn test_report_is_strictly_sorted() {
    let dir = TempDir::new().unwrap();
    let cities = ["zeta", "Alpha", "Ürümqi", "alpha", "Zeta", "Beta", "Ahmedabad"];
    for rank in 0..3 {
        let contents: String = cities
            .iter()
            .map(|city| format!("{};{}.5\n", city, rank))
            .collect();
        write_partition(dir.path(), rank, &contents);
    }

    let summary = Coordinator::new(settings(dir.path(), 3, Transport::Thread))
        .run()
        .await
        .unwrap();

    let report = std::fs::read_to_string(&summary.output_path).unwrap();
    let names: Vec<&str> = report
        .lines()
        .map(|line| line.split_once('=').unwrap().0)
        .collect();
    assert_eq!(names.len(), cities.len());
    assert!(names.windows(2).all(|w| w[0].as_bytes() < w[1].as_bytes()));
    assert_eq!(summary.readings, 21);
}

#[tokio::test]
async fn test_library_process_transport() {
    let dir = TempDir::new().unwrap();
    write_mixed_partitions(dir.path());

    let summary = Coordinator::new(settings(dir.path(), 3, Transport::Process))
        .with_program(BIN)
        .run()
        .await
        .unwrap();

    assert_eq!(summary.ranks.len(), 3);
    assert_eq!(summary.cities, 5);
    assert_eq!(summary.readings, 11);
    assert!(summary.output_path.ends_with("results-3.txt"));
}

#[tokio::test]
async fn test_malformed_lines_are_ignored() {
    let dir = TempDir::new().unwrap();
    write_partition(dir.path(), 0, "Paris;22.5\nGARBAGE_LINE\nParis;18.0\n");

    let summary = Coordinator::new(settings(dir.path(), 1, Transport::Thread))
        .run()
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(summary.output_path).unwrap(),
        "Paris=18.0/20.3/22.5\n"
    );
}
