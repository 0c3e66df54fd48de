use aurora_archive::{
    error::{Error, NotFoundError},
    BifArchive, ChitinIndex, ErfArchive, ResourceContainer, RimArchive,
};
use aurora_common::{ResourceKey, ResourceType};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_test::traced_test;
use walkdir::WalkDir;

fn resources() -> PathBuf {
    PathBuf::from(format!("{}/resources", env!("CARGO_MANIFEST_DIR")))
}

fn open_container(path: &Path) -> Result<Box<dyn ResourceContainer>, Error> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("rim") => Ok(Box::new(RimArchive::new(path.to_path_buf())?)),
        _ => Ok(Box::new(ErfArchive::new(path.to_path_buf())?)),
    }
}

fn validate_archive(path: &Path) -> Result<(), Error> {
    info!("testing {}", path.display());

    let parent_dir = path.with_extension("");
    info!("comparing to files in {}", parent_dir.display());

    let expected_files = WalkDir::new(&parent_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| !e.file_type().is_dir())
        .collect::<Vec<_>>();

    let archive = open_container(path)?;
    let keys = archive.keys();
    assert_eq!(keys.len(), expected_files.len());

    for key in keys {
        let p = parent_dir.join(key.file_name());
        info!("comparing to {}", p.display());

        let expected = std::fs::read(&p)?;
        let actual = archive.read(&key)?;
        assert_eq!(actual, Some(expected));
    }

    Ok(())
}

#[traced_test]
#[test]
fn validate_archive_parsing() -> Result<(), Error> {
    let to_test = std::fs::read_dir(resources())?
        .filter_map(|res| res.ok())
        .map(|dir_entry| dir_entry.path())
        .filter(|e| e.is_file())
        .collect::<Vec<_>>();

    assert!(!to_test.is_empty());
    for path in to_test {
        validate_archive(&path)?;
    }

    Ok(())
}

#[traced_test]
#[test]
fn module_descriptions() -> Result<(), Error> {
    let erf = ErfArchive::new(resources().join("taris.mod"))?;
    assert_eq!(erf.file_type(), "MOD");
    assert_eq!(erf.descriptions()[0].text, "Taris Upper City");
    assert_eq!(erf.header().build_year, 103);
    Ok(())
}

#[traced_test]
#[test]
fn chitin_index_resolves_through_bifs() -> Result<(), Error> {
    let index = ChitinIndex::open(&resources().join("game"))?;
    assert_eq!(index.key_file().files()[0].file_name, "data/templates.bif");
    assert_eq!(index.bifs().len(), 1);

    let bastila = ResourceKey::new("P_Bastila", ResourceType::Utc);
    assert!(index.contains(&bastila));
    assert_eq!(index.read(&bastila)?, Some(b"UTC V3.2 bastila".to_vec()));

    let missing = ResourceKey::new("p_carth", ResourceType::Utc);
    assert!(!index.contains(&missing));
    assert_eq!(index.read(&missing)?, None);

    Ok(())
}

#[test]
fn missing_installation() {
    let result = ChitinIndex::open(&resources().join("taris"));
    assert!(matches!(result, Err(Error::MissingFile(_))));
}

#[test]
fn bif_lookup_by_id() -> Result<(), Error> {
    #[rustfmt::skip]
    let input = vec![
        0x42, 0x49, 0x46, 0x46, 0x56, 0x31, 0x20, 0x20,
        0x01, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        0x14, 0x00, 0x00, 0x00,
        // id 5, offset 20, size 8, type 2002
        0x05, 0x00, 0x00, 0x00,
        0x14, 0x00, 0x00, 0x00,
        0x08, 0x00, 0x00, 0x00,
        0xD2, 0x07, 0x00, 0x00,
    ];

    let bif = BifArchive::new(input)?;
    let record = bif.by_id(5)?;
    assert_eq!(record.id, 5);
    assert_eq!(record.offset, 20);
    assert_eq!(record.size, 8);
    assert_eq!(record.restype, 2002);

    assert!(matches!(
        bif.by_id(6),
        Err(Error::ResourceNotFound(NotFoundError::Id(6)))
    ));

    Ok(())
}
