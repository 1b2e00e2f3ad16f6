//! Reading tables from files on disk, plain and compressed.

use ironframe::io::compression::codec_for_path;
use ironframe::testing::{MIXED_TYPES, assert_layout};
use ironframe::{ColumnType, ReaderBuilder, TableReader};
use std::io::Write;
use tempfile::TempDir;

use ColumnType::{Bool, Float, Int, Text};

fn write_plain(dir: &TempDir, name: &str, text: &str) -> anyhow::Result<std::path::PathBuf> {
    let path = dir.path().join(name);
    std::fs::write(&path, text)?;
    Ok(path)
}

#[test]
fn reads_a_plain_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_plain(&dir, "mixed.txt", MIXED_TYPES)?;

    let table = TableReader::new(Vec::new())?.read_file(&path)?;
    assert_eq!(table.row_count(), 6);
    assert_layout(&table, &[("V0", Bool), ("V1", Int), ("V2", Float), ("V3", Text)]);
    Ok(())
}

#[test]
fn missing_file_reports_the_path() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("absent.txt");

    let err = TableReader::new(Vec::new())?.read_file(&path).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.starts_with("open "), "{msg}");
    assert!(msg.contains("absent.txt"), "{msg}");
    Ok(())
}

#[test]
fn line_errors_are_labelled_with_the_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_plain(&dir, "ragged.txt", "1 2 3\n4 5\n")?;

    let err = TableReader::new(Vec::new())?.read_file(&path).unwrap_err();
    let expected = format!("file: {}:2: ", path.display());
    assert!(err.to_string().starts_with(&expected), "{err}");
    Ok(())
}

#[test]
fn codec_is_chosen_by_extension() {
    assert_eq!(codec_for_path("data.txt"), None);
    #[cfg(feature = "compression-gzip")]
    assert_eq!(codec_for_path("data.txt.gz").as_deref(), Some("gzip"));
    #[cfg(feature = "compression-zstd")]
    assert_eq!(codec_for_path("data.zst").as_deref(), Some("zstd"));
    #[cfg(feature = "compression-bzip2")]
    assert_eq!(codec_for_path("data.bz2").as_deref(), Some("bzip2"));
    #[cfg(feature = "compression-xz")]
    assert_eq!(codec_for_path("data.xz").as_deref(), Some("xz"));
}

#[cfg(feature = "compression-gzip")]
mod gzip {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    fn write_gzip(dir: &TempDir, name: &str, text: &str) -> anyhow::Result<std::path::PathBuf> {
        let path = dir.path().join(name);
        let mut encoder = GzEncoder::new(std::fs::File::create(&path)?, Compression::default());
        encoder.write_all(text.as_bytes())?;
        encoder.finish()?;
        Ok(path)
    }

    #[test]
    fn reads_a_gzip_file_by_extension() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_gzip(&dir, "people.txt.gz", "name age\nann 31\nbob 27\n")?;

        let reader = ReaderBuilder::new().has_header().build()?;
        let table = reader.read_file(&path)?;
        assert_layout(&table, &[("name", Text), ("age", Int)]);
        assert_eq!(table.int_values_by_name("age")?[1].get(), Some(27));
        Ok(())
    }

    #[test]
    fn reads_a_gzip_file_by_content() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_gzip(&dir, "no_extension", MIXED_TYPES)?;

        let table = TableReader::new(Vec::new())?.read_file(&path)?;
        assert_eq!(table.row_count(), 6);
        assert_eq!(table.column_count(), 4);
        Ok(())
    }
}

#[cfg(feature = "compression-zstd")]
#[test]
fn reads_a_zstd_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("values.zst");
    let compressed = zstd::encode_all("1.5 x\n2.5 y\n".as_bytes(), 0)?;
    std::fs::File::create(&path)?.write_all(&compressed)?;

    let table = TableReader::new(Vec::new())?.read_file(&path)?;
    assert_layout(&table, &[("V0", Float), ("V1", Text)]);
    Ok(())
}

#[test]
fn text_starting_like_bzip2_is_read_as_text() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_plain(&dir, "people.txt", "BZhang 1\nLi 2\n")?;

    let table = TableReader::new(Vec::new())?.read_file(&path)?;
    assert_layout(&table, &[("V0", Text), ("V1", Int)]);
    assert_eq!(table.text_values_at(0)?[0].get(), Some("BZhang"));
    Ok(())
}

#[cfg(feature = "compression-bzip2")]
#[test]
fn reads_a_bzip2_file_by_content() -> anyhow::Result<()> {
    use bzip2::Compression;
    use bzip2::write::BzEncoder;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("no_extension");
    let mut encoder = BzEncoder::new(std::fs::File::create(&path)?, Compression::best());
    encoder.write_all(b"BZhang 1\nLi 2\n")?;
    encoder.finish()?;

    let table = TableReader::new(Vec::new())?.read_file(&path)?;
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.text_values_at(0)?[1].get(), Some("Li"));
    Ok(())
}

#[test]
fn invalid_utf8_in_a_file_does_not_stop_the_read() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("latin1.txt");
    std::fs::write(&path, b"caf\xe9 1\nbar 2\n")?;

    let table = ReaderBuilder::new().permissive().build()?.read_file(&path)?;
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.error_count(), 0);
    Ok(())
}
