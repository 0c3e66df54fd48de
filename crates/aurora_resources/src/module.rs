//! Game modules: the archives, area files and object instances of a playable area
//!

use aurora_archive::{ErfArchive, RimArchive};
use aurora_common::coords::position_from_raw;
use aurora_common::source::find_case_insensitive;
use aurora_common::{ResRef, ResourceKey, ResourceType};
use aurora_gff::{GffNode, GffValue};
use glam::{Quat, Vec3};
use std::path::Path;
use tracing::{debug, instrument, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::resources::{Container, Resources, MODULE_DIRECTORY};

/// Table mapping the music ids of an area to music resources
pub const AMBIENT_MUSIC_TABLE: &str = "ambientmusic";

/// An object placed in an area
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Instance {
    /// Template the object is created from
    pub template: ResRef,
    pub position: Vec3,
    pub orientation: Quat,
}

/// A loaded module
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    /// The area the player enters the module in
    pub area: String,
    pub entry_position: Vec3,
    pub entry_orientation: Quat,
    pub ifo: GffNode,
    pub are: GffNode,
    pub git: GffNode,
    pub layout: Layout,
    pub creatures: Vec<Instance>,
    pub doors: Vec<Instance>,
    pub placeables: Vec<Instance>,
    /// Music resource of the area by day
    pub ambient_music: Option<String>,
}

impl Module {
    /// Load the module `name` from the modules directory of the installation
    ///
    /// A `<name>.mod` archive replaces the `<name>.rim` and `<name>_s.rim` pair when present.
    /// The archives are registered as session layers of `resources`.
    #[instrument(skip(resources), err)]
    pub fn load(resources: &mut Resources, name: &str) -> Result<Module> {
        let directory = resources
            .module_directory()
            .ok_or_else(|| Error::MissingModule(Path::new(MODULE_DIRECTORY).join(name)))?;
        let layers = open_archives(&directory, name)?;
        Module::with_layers(resources, name, layers)
    }

    /// Register `layers` as session layers and decode the module they contain
    pub fn with_layers(
        resources: &mut Resources,
        name: &str,
        layers: Vec<Container>,
    ) -> Result<Module> {
        for layer in layers {
            resources.add_session_layer(layer);
        }

        let ifo = require_gff(resources, ResourceKey::new("module", ResourceType::Ifo))?;
        let area = text(ifo.get("Mod_Entry_Area")?)?;
        let entry_position = position_from_raw(
            ifo.get("Mod_Entry_X")?.as_f32()?,
            ifo.get("Mod_Entry_Y")?.as_f32()?,
            ifo.get("Mod_Entry_Z")?.as_f32()?,
        );
        let entry_orientation = match (
            ifo.try_get("Mod_Entry_Dir_X")?,
            ifo.try_get("Mod_Entry_Dir_Y")?,
        ) {
            (Some(x), Some(y)) => facing(x.as_f32()?, y.as_f32()?),
            _ => Quat::IDENTITY,
        };

        let are = require_gff(resources, ResourceKey::new(area.as_str(), ResourceType::Are))?;
        let git = require_gff(resources, ResourceKey::new(area.as_str(), ResourceType::Git))?;

        let layout = match resources.load_layout(&area)? {
            Some(layout) => layout,
            None => {
                warn!("area {area} has no room layout");
                Layout::default()
            }
        };

        let creatures = instances(&git, "Creature List", creature_placement)?;
        let doors = instances(&git, "Door List", object_placement)?;
        let placeables = instances(&git, "Placeable List", object_placement)?;
        debug!(
            creatures = creatures.len(),
            doors = doors.len(),
            placeables = placeables.len(),
            "loaded area {area}"
        );

        let ambient_music = ambient_music(resources, &git)?;

        Ok(Module {
            name: name.to_ascii_lowercase(),
            area,
            entry_position,
            entry_orientation,
            ifo,
            are,
            git,
            layout,
            creatures,
            doors,
            placeables,
            ambient_music,
        })
    }

    /// Remove the module's archives from `resources`
    pub fn unload(self, resources: &mut Resources) {
        debug!("unloading module {}", self.name);
        resources.clear_session_layers();
    }
}

fn open_archives(directory: &Path, name: &str) -> Result<Vec<Container>> {
    if let Some(path) = find_case_insensitive(directory, &format!("{name}.mod")) {
        debug!("module archive {}", path.display());
        let archive: Container = Box::new(ErfArchive::new(path)?);
        return Ok(vec![archive]);
    }

    let rim_name = format!("{name}.rim");
    let rim = find_case_insensitive(directory, &rim_name)
        .ok_or_else(|| Error::MissingModule(directory.join(&rim_name)))?;
    let rim: Container = Box::new(RimArchive::new(rim)?);
    let mut layers = vec![rim];

    match find_case_insensitive(directory, &format!("{name}_s.rim")) {
        Some(path) => layers.push(Box::new(RimArchive::new(path)?)),
        None => debug!("module {name} has no _s.rim"),
    }

    Ok(layers)
}

fn require_gff(resources: &Resources, key: ResourceKey) -> Result<GffNode> {
    match resources.load_gff(&key)? {
        Some(gff) => Ok(gff.into_root()),
        None => Err(Error::MissingResource(key)),
    }
}

/// Resrefs are stored as either resref or string fields depending on the tool that wrote the file
fn text(node: &GffNode) -> Result<String> {
    match node.value() {
        GffValue::ResRef(resref) => Ok(resref.as_str().to_owned()),
        _ => Ok(node.as_str()?.to_ascii_lowercase()),
    }
}

/// Rotation about the up axis by a bearing in radians
fn bearing(bearing: f32) -> Quat {
    Quat::from_rotation_y(-bearing)
}

/// Rotation of an object looking along the ground plane direction `(x, y)`
fn facing(x: f32, y: f32) -> Quat {
    bearing(x.atan2(y))
}

fn creature_placement(item: &GffNode) -> Result<(Vec3, Quat)> {
    let position = position_from_raw(
        item.get("XPosition")?.as_f32()?,
        item.get("YPosition")?.as_f32()?,
        item.get("ZPosition")?.as_f32()?,
    );
    let orientation = facing(
        item.get("XOrientation")?.as_f32()?,
        item.get("YOrientation")?.as_f32()?,
    );
    Ok((position, orientation))
}

fn object_placement(item: &GffNode) -> Result<(Vec3, Quat)> {
    let position = position_from_raw(
        item.get("X")?.as_f32()?,
        item.get("Y")?.as_f32()?,
        item.get("Z")?.as_f32()?,
    );
    Ok((position, bearing(item.get("Bearing")?.as_f32()?)))
}

fn instances(
    git: &GffNode,
    list: &str,
    placement: fn(&GffNode) -> Result<(Vec3, Quat)>,
) -> Result<Vec<Instance>> {
    let Some(items) = git.try_get(list)? else {
        return Ok(Vec::new());
    };

    items
        .items()?
        .iter()
        .map(|item| -> Result<Instance> {
            let (position, orientation) = placement(item)?;
            Ok(Instance {
                template: ResRef::new(text(item.get("TemplateResRef")?)?),
                position,
                orientation,
            })
        })
        .collect()
}

fn ambient_music(resources: &Resources, git: &GffNode) -> Result<Option<String>> {
    let Some(music) = git
        .try_get("AreaProperties")?
        .map(|properties| properties.try_get("MusicDay"))
        .transpose()?
        .flatten()
    else {
        return Ok(None);
    };
    let row = music.as_int()?;

    let Some(table) = resources.load_table(AMBIENT_MUSIC_TABLE)? else {
        return Ok(None);
    };
    if table.column_index("resource").is_none() {
        warn!("{AMBIENT_MUSIC_TABLE} has no resource column");
        return Ok(None);
    }
    match usize::try_from(row) {
        Ok(row) if row < table.row_count() => Ok(table.get(row, "resource")?.map(str::to_owned)),
        _ => {
            warn!("music id {row} is not a row of {AMBIENT_MUSIC_TABLE}");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod test {
    use glam::{Quat, Vec3};

    use super::{bearing, facing};

    #[test]
    fn facing_matches_bearing() {
        let expected = bearing(std::f32::consts::FRAC_PI_2);
        assert!(facing(1.0, 0.0).abs_diff_eq(expected, 1e-6));
        assert!(facing(0.0, 1.0).abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn bearing_turns_about_up_axis() {
        let turned = bearing(std::f32::consts::PI) * Vec3::Z;
        assert!(turned.abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }
}
