use std::fs::File;
use std::path::PathBuf;

use aurora_gff::error::{Error, Result};
use aurora_gff::{FieldType, Gff, GffWriter};
use glam::Vec3;
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn open_resource(name: &str) -> Result<File> {
    let path = PathBuf::from(format!("{}/resources/{name}", env!("CARGO_MANIFEST_DIR")));
    Ok(File::open(path)?)
}

#[traced_test]
#[test]
fn parse_module_info() -> Result<()> {
    let ifo = Gff::read(open_resource("module.ifo")?)?;

    assert_eq!(ifo.file_type, "IFO");
    assert_eq!(ifo.version, "V3.2");
    assert_eq!(ifo.len()?, 11);

    assert_eq!(ifo.get("Mod_Tag")?.as_str()?, "DANM13");
    assert_eq!(ifo.get("Mod_Entry_Area")?.as_resref()?.as_str(), "danm13");
    assert_eq!(
        ifo.get("Mod_Name")?.as_loc_string()?.text(),
        Some("Dantooine Enclave")
    );
    assert_eq!(ifo.get("Mod_StartMinute")?.as_i32()?, -1);

    let entry = Vec3::new(
        ifo.get("Mod_Entry_X")?.as_f32()?,
        ifo.get("Mod_Entry_Y")?.as_f32()?,
        ifo.get("Mod_Entry_Z")?.as_f32()?,
    );
    assert_eq!(entry, Vec3::new(101.25, -42.5, 3.0));

    let areas = ifo.get("Mod_Area_list")?;
    assert_eq!(areas.field_type(), FieldType::List);
    assert_eq!(areas.len()?, 2);
    assert_eq!(areas.at(1)?.struct_id(), Some(6));
    assert_eq!(areas[1]["Area_Name"].as_resref()?.as_str(), "danm14aa");

    Ok(())
}

#[test]
fn accessors_fail_on_wrong_shape() -> Result<()> {
    let ifo = Gff::read(open_resource("module.ifo")?)?;

    let tag = ifo.get("Mod_Tag")?;
    assert!(matches!(tag.at(0), Err(Error::TypeMismatch { .. })));
    assert!(matches!(tag.get("x"), Err(Error::TypeMismatch { .. })));
    assert!(matches!(ifo.at(0), Err(Error::TypeMismatch { .. })));
    assert!(matches!(
        ifo.get("Mod_Area_list")?.get("Area_Name"),
        Err(Error::TypeMismatch { .. })
    ));

    Ok(())
}

#[test]
fn rewrite_module_info() -> Result<()> {
    let ifo = Gff::read(open_resource("module.ifo")?)?;

    let bytes = GffWriter::for_extension("ifo").to_bytes(&ifo.root)?;
    let rewritten = Gff::read(std::io::Cursor::new(bytes))?;

    assert_eq!(rewritten, ifo);

    Ok(())
}
