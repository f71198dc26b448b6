use xmicarve::{CarveOptions, Carver, ReportWriter};

fn stored(name: &str, method: u16, payload: &[u8]) -> Vec<u8> {
    let len = payload.len() as u32;
    let mut data = Vec::new();
    data.extend_from_slice(b"PK\x03\x04");
    data.extend_from_slice(&20u16.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&method.to_le_bytes());
    data.extend_from_slice(&[0, 0, 0, 0]);
    data.extend_from_slice(&crc32fast::hash(payload).to_le_bytes());
    data.extend_from_slice(&len.to_le_bytes());
    data.extend_from_slice(&len.to_le_bytes());
    data.extend_from_slice(&(name.len() as u16).to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(name.as_bytes());
    data.extend_from_slice(payload);
    data
}

fn dump() -> Vec<u8> {
    let mut buffer = stored("A", 0, b"hello");
    buffer.extend(stored("../escape/B.TXT", 0, b"world"));
    buffer.extend(stored("BROKEN", 99, &[0xFF, 0x00, 0xFF]));
    buffer
}

#[tokio::test]
async fn writes_recovered_entries_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let buffer = dump();
    let report = Carver::new(CarveOptions::default()).carve(&buffer);

    let writer = ReportWriter::new(dir.path()).json(true).save_failed(true);
    let summary = writer.write(&report, &buffer).await.unwrap();
    assert_eq!(summary.written.len(), 4);
    assert!(summary.existing.is_empty());

    assert_eq!(std::fs::read(dir.path().join("000_A")).unwrap(), b"hello");
    assert_eq!(
        std::fs::read(dir.path().join("001___escape_B.TXT")).unwrap(),
        b"world"
    );
    assert_eq!(
        std::fs::read(dir.path().join("002_BROKEN.raw.bin")).unwrap(),
        [0xFF, 0x00, 0xFF]
    );

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("report.json")).unwrap()).unwrap();
    assert_eq!(json["summary"]["entries"], 3);
    assert_eq!(json["summary"]["failed"], 1);
    assert_eq!(json["entries"][2]["result"]["status"], "failed");

    // Nothing escapes the output directory
    let count = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(count, 4);
}

#[tokio::test]
async fn failed_entries_skipped_unless_asked() {
    let dir = tempfile::tempdir().unwrap();
    let buffer = dump();
    let report = Carver::default().carve(&buffer);

    let summary = ReportWriter::new(dir.path())
        .write(&report, &buffer)
        .await
        .unwrap();
    assert_eq!(summary.written.len(), 2);
    assert!(!dir.path().join("002_BROKEN.raw.bin").exists());
}

#[tokio::test]
async fn existing_files_are_kept_unless_overwriting() {
    let dir = tempfile::tempdir().unwrap();
    let buffer = stored("A", 0, b"hello");
    let report = Carver::default().carve(&buffer);
    let target = dir.path().join("000_A");
    std::fs::write(&target, b"previous").unwrap();

    let summary = ReportWriter::new(dir.path())
        .write(&report, &buffer)
        .await
        .unwrap();
    assert!(summary.written.is_empty());
    assert_eq!(summary.existing, vec![target.clone()]);
    assert_eq!(std::fs::read(&target).unwrap(), b"previous");

    let summary = ReportWriter::new(dir.path())
        .overwrite(true)
        .write(&report, &buffer)
        .await
        .unwrap();
    assert_eq!(summary.written, vec![target.clone()]);
    assert_eq!(std::fs::read(&target).unwrap(), b"hello");
}
