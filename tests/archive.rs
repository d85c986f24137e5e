use std::io::{Read, Write};
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

use flate2::Compression as GzLevel;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use runar::{ArError, ArchiveOptions, ArchiveReader, Compatibility, Compression, MemoryReader};

struct Entry<'a> {
    name: &'a str,
    mtime: u64,
    uid: u32,
    gid: u32,
    mode: u32,
    data: &'a [u8],
}

impl<'a> Entry<'a> {
    fn new(name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            mtime: 1_700_000_000,
            uid: 0,
            gid: 0,
            mode: 100644,
            data,
        }
    }
}

fn build(entries: &[Entry], padded: bool) -> Vec<u8> {
    let mut out = b"!<arch>\n".to_vec();
    for e in entries {
        let header = format!(
            "{:<16}{:<12}{:<6}{:<6}{:<8}{:<10}`\n",
            e.name,
            e.mtime,
            e.uid,
            e.gid,
            e.mode,
            e.data.len()
        );
        assert_eq!(header.len(), 60);
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(e.data);
        if padded && e.data.len() % 2 == 1 {
            out.push(b'\n');
        }
    }
    out
}

fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(bytes).unwrap();
    tmp.flush().unwrap();
    tmp
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), GzLevel::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn debian_binary_round_trip() {
    let entry = Entry {
        name: "debian-binary",
        mtime: 1_650_000_123,
        uid: 1000,
        gid: 100,
        mode: 100644,
        data: b"2.0\n",
    };
    let tmp = write_temp(&build(&[entry], true));

    let mut archive = ArchiveReader::open(tmp.path(), ArchiveOptions::default()).unwrap();
    let member = archive.get("debian-binary").unwrap().unwrap();

    assert_eq!(member.data(), b"2.0\n");
    assert_eq!(member.mode(), 100644);
    assert_eq!(member.uid(), 1000);
    assert_eq!(member.gid(), 100);
    assert_eq!(member.size(), 4);
    assert_eq!(member.mtime(), UNIX_EPOCH + Duration::from_secs(1_650_000_123));
    assert_eq!(archive.debian_version().unwrap().as_deref(), Some("2.0"));
}

#[test]
fn debian_package_layout() {
    let control = gzip(b"Package: hello\nVersion: 1.0\n");
    let data = b"odd-sized payload";
    let bytes = build(
        &[
            Entry::new("debian-binary", b"2.0\n"),
            Entry::new("control.tar.gz", &control),
            Entry::new("data.tar.xz", data),
        ],
        true,
    );
    let tmp = write_temp(&bytes);

    let mut archive = runar::ar::open(tmp.path(), "r", 16).unwrap();
    assert_eq!(
        archive.list().unwrap(),
        ["debian-binary", "control.tar.gz", "data.tar.xz"]
    );

    let names: Vec<String> = archive.list().unwrap().iter().map(|s| s.to_string()).collect();
    for name in &names {
        let member = archive.get(name).unwrap().unwrap();
        assert_eq!(member.data().len() as u64, member.size());
    }

    let member = archive.get("control.tar.gz").unwrap().unwrap();
    assert_eq!(member.compression(), Compression::Gzip);
    let mut text = String::new();
    GzDecoder::new(member.reader())
        .read_to_string(&mut text)
        .unwrap();
    assert!(text.starts_with("Package: hello"));

    assert_eq!(archive.get("data.tar.xz").unwrap().unwrap().data(), data);
}

#[test]
fn concrete_scenario() {
    let bytes = build(
        &[Entry {
            name: "x",
            mtime: 0,
            uid: 0,
            gid: 0,
            mode: 0,
            data: b"DATA",
        }],
        true,
    );
    let mut archive =
        ArchiveReader::from_source(MemoryReader::new(bytes), ArchiveOptions::default()).unwrap();
    assert_eq!(archive.list().unwrap(), ["x"]);
    assert_eq!(archive.get("x").unwrap().unwrap().data(), b"DATA");
    assert!(archive.get("y").unwrap().is_none());
}

#[test]
fn empty_archive() {
    let tmp = write_temp(b"!<arch>\n");
    let mut archive = ArchiveReader::open(tmp.path(), ArchiveOptions::default()).unwrap();
    assert!(archive.list().unwrap().is_empty());
}

#[test]
fn not_an_archive() {
    let tmp = write_temp(b"PK\x03\x04 this is a zip file");
    let err = ArchiveReader::open(tmp.path(), ArchiveOptions::default())
        .err()
        .unwrap();
    assert!(matches!(err, ArError::Format(_)));
}

#[test]
fn open_modes() {
    let tmp = write_temp(b"!<arch>\n");
    assert!(matches!(
        runar::ar::open(tmp.path(), "x", 1024).err().unwrap(),
        ArError::InvalidMode(_)
    ));
    assert!(matches!(
        runar::ar::open(tmp.path(), "w", 1024).err().unwrap(),
        ArError::Unsupported(_)
    ));
}

#[test]
fn write_mode_does_not_touch_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.deb");
    assert!(runar::ar::open(&path, "w", 1024).is_err());
    assert!(!Path::new(&path).exists());
}

#[test]
fn duplicate_names_keep_last() {
    let bytes = build(
        &[
            Entry::new("member", b"first"),
            Entry::new("member", b"second"),
        ],
        true,
    );
    let mut archive =
        ArchiveReader::from_source(MemoryReader::new(bytes), ArchiveOptions::default()).unwrap();
    assert_eq!(archive.list().unwrap(), ["member"]);
    assert_eq!(archive.get("member").unwrap().unwrap().data(), b"second");
}

#[test]
fn truncated_payload_is_an_error() {
    let mut bytes = build(&[Entry::new("data.tar.xz", b"0123456789")], true);
    bytes.truncate(bytes.len() - 4);
    let tmp = write_temp(&bytes);

    let mut archive = ArchiveReader::open(tmp.path(), ArchiveOptions::default()).unwrap();
    match archive.list() {
        Err(ArError::TruncatedMember {
            name,
            expected,
            actual,
        }) => {
            assert_eq!(name, "data.tar.xz");
            assert_eq!(expected, 10);
            assert_eq!(actual, 6);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn legacy_layout() {
    let bytes = build(
        &[Entry::new("a", b"odd"), Entry::new("b", b"even")],
        false,
    );
    let options = ArchiveOptions::default().with_compatibility(Compatibility::Legacy);
    let mut archive = ArchiveReader::from_source(MemoryReader::new(bytes), options).unwrap();
    assert_eq!(archive.list().unwrap(), ["a", "b"]);
    assert_eq!(archive.get("b").unwrap().unwrap().data(), b"even");
}

#[test]
fn closed_reader_rejects_operations() {
    let tmp = write_temp(&build(&[Entry::new("x", b"DATA")], true));
    let mut archive = ArchiveReader::open(tmp.path(), ArchiveOptions::default()).unwrap();
    assert_eq!(archive.list().unwrap().len(), 1);

    archive.close().unwrap();
    assert!(matches!(archive.get("x"), Err(ArError::InvalidState(_))));
    assert!(matches!(archive.rewind(), Err(ArError::InvalidState(_))));
}

#[test]
fn members_outlive_the_reader() {
    let tmp = write_temp(&build(&[Entry::new("x", b"DATA")], true));
    let mut archive = ArchiveReader::open(tmp.path(), ArchiveOptions::default()).unwrap();
    let member = archive.get("x").unwrap().unwrap().clone();
    drop(archive);
    drop(tmp);
    assert_eq!(member.into_data(), b"DATA");
}
