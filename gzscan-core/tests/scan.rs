use gzscan_core::gzip::header::{FEXTRA, FNAME, MAGIC};
use gzscan_core::{CollectSink, Finding, ScanOptions, Scanner, scan_file};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const STAMP: u32 = 1_700_000_000;

fn header(flags: u8, os: u8, fields: &[u8]) -> Vec<u8> {
    let mut h = MAGIC.to_vec();
    h.push(flags);
    h.extend_from_slice(&STAMP.to_le_bytes());
    h.push(0);
    h.push(os);
    h.extend_from_slice(fields);
    h
}

fn write_file(data: &[u8]) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(data).unwrap();
    f.flush().unwrap();
    f
}

fn scan(path: &Path, threads: usize) -> Vec<Finding> {
    let sink = CollectSink::new();
    scan_file(path, &ScanOptions::with_threads(threads), &sink).unwrap();
    sink.into_findings()
}

/// Filler with no 0x1F byte, so it can never produce a candidate.
fn noise(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 29) as u8 + 0x20).collect()
}

#[test]
fn test_header_on_range_boundary_found_once() {
    let len = 600_000usize;
    for threads in [1usize, 2, 3, 4, 7, 16] {
        let boundary = if threads == 1 { len / 2 } else { len / threads };
        let mut data = noise(len);
        let h = header(FNAME, 3, b"boundary.gz\0");
        data[boundary..boundary + h.len()].copy_from_slice(&h);
        let f = write_file(&data);

        let found = scan(f.path(), threads);
        assert_eq!(found.len(), 1, "threads={threads}");
        assert_eq!(found[0].position, boundary as u64);
        assert_eq!(found[0].filename.as_deref(), Some("boundary.gz"));
    }
}

#[test]
fn test_header_just_before_boundary_read_through_overlap() {
    let len = 400_000usize;
    let threads = 4;
    let at = len / threads - 5;
    let mut data = noise(len);
    let mut fields = Vec::new();
    fields.extend_from_slice(&600u16.to_le_bytes());
    fields.extend(std::iter::repeat_n(0x42, 600));
    fields.extend_from_slice(b"split.txt\0");
    let h = header(FEXTRA | FNAME, 3, &fields);
    data[at..at + h.len()].copy_from_slice(&h);
    let f = write_file(&data);

    let found = scan(f.path(), threads);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].position, at as u64);
    assert_eq!(found[0].worker, 0);
    assert_eq!(found[0].extra.as_deref().map(str::len), Some(1200));
    assert_eq!(found[0].filename.as_deref(), Some("split.txt"));
}

#[test]
fn test_reserved_flag_bit_rejected() {
    let mut data = noise(4096);
    let h = header(0x20, 3, b"");
    data[100..100 + h.len()].copy_from_slice(&h);
    let f = write_file(&data);
    assert!(scan(f.path(), 2).is_empty());
}

#[test]
fn test_reserved_os_rejected() {
    let mut data = noise(4096);
    let h = header(0, 200, b"");
    data[100..100 + h.len()].copy_from_slice(&h);
    let f = write_file(&data);
    assert!(scan(f.path(), 2).is_empty());
}

#[test]
fn test_name_and_timestamp_extracted() {
    let mut data = noise(10_000);
    let h = header(FNAME, 3, b"test.txt\0");
    data[4321..4321 + h.len()].copy_from_slice(&h);
    let f = write_file(&data);

    let found = scan(f.path(), 3);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].filename.as_deref(), Some("test.txt"));
    assert_eq!(found[0].mtime, STAMP);
    assert_eq!(found[0].stamp(), "2023-11-14T22:13:20Z");
    assert_eq!(found[0].os_name, "Unix");
}

#[test]
fn test_oversized_name_rejected() {
    let mut data = noise(4096);
    let mut name = vec![b'n'; 300];
    name.push(0);
    let h = header(FNAME, 3, &name);
    data[10..10 + h.len()].copy_from_slice(&h);
    let f = write_file(&data);
    assert!(scan(f.path(), 1).is_empty());
}

#[test]
fn test_concatenated_members_all_reported() {
    let mut data = Vec::new();
    for i in 0..5 {
        data.extend(header(FNAME, 3, format!("part{i}\0").as_bytes()));
        data.extend(noise(7));
    }
    data.extend(noise(64));
    let f = write_file(&data);
    let names: Vec<_> = scan(f.path(), 1)
        .into_iter()
        .filter_map(|x| x.filename)
        .collect();
    assert_eq!(names, ["part0", "part1", "part2", "part3", "part4"]);
}

#[test]
fn test_repeat_scans_are_identical() {
    let mut data = noise(1_500_000);
    for (i, at) in [0usize, 77_777, 512_000, 1_048_575, 1_400_000].into_iter().enumerate() {
        let h = header(FNAME, (i % 14) as u8, format!("m{i}\0").as_bytes());
        data[at..at + h.len()].copy_from_slice(&h);
    }
    let f = write_file(&data);

    let key = |v: Vec<Finding>| -> BTreeSet<(u64, String)> {
        v.into_iter().map(|x| (x.position, x.to_string())).collect()
    };
    let a = key(scan(f.path(), 5));
    let b = key(scan(f.path(), 5));
    assert_eq!(a.len(), 5);
    assert_eq!(a, b);
}

#[test]
fn test_findings_within_worker_are_ordered() {
    let mut data = noise(200_000);
    for at in (1_000..190_000).step_by(9_000) {
        let h = header(0, 3, b"");
        data[at..at + h.len()].copy_from_slice(&h);
    }
    let f = write_file(&data);
    let file = std::fs::File::open(f.path()).unwrap();
    let scanner = Scanner::new(file, data.len() as u64, &ScanOptions::with_threads(3)).unwrap();

    let seen = std::sync::Mutex::new(Vec::new());
    let summary = scanner
        .run(&|x: Finding| seen.lock().unwrap().push((x.worker, x.position)))
        .unwrap();
    let seen = seen.into_inner().unwrap();
    assert_eq!(summary.findings as usize, seen.len());
    for w in 0..3 {
        let mine: Vec<u64> = seen.iter().filter(|(k, _)| *k == w).map(|(_, p)| *p).collect();
        assert!(mine.windows(2).all(|p| p[0] < p[1]), "worker {w}: {mine:?}");
    }
}

#[test]
fn test_missing_file_reports_path() {
    let err = scan_file(
        Path::new("/nonexistent/gzscan/input.bin"),
        &ScanOptions::with_threads(1),
        &CollectSink::new(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("/nonexistent/gzscan/input.bin"));
}
