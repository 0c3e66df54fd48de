//! Types for reading binary MDL/MDX pairs

use aurora_common::{
    coords::{orientation_from_raw, position_from_raw},
    cursor::{trim_nul, SeekExt},
    Game,
};
use binrw::BinRead;
use byteorder::{LittleEndian, ReadBytesExt};
use glam::{Quat, Vec2, Vec3};
use std::io::{Read, Seek, SeekFrom};
use tracing::{debug, instrument, warn};

use crate::{
    curve::decode_curves,
    error::{Error, Result},
    model::{Animation, Classification, Event, Model},
    node::{
        BoneWeight, Dirt, Light, Mesh, ModelNode, NodeFlags, NodeId, NodeKind, NodeTree, Saber,
        Skin,
    },
    types::{
        AnimationHeader, ArrayDef, CurveKey, EventRecord, FileHeader, GeometryHeader, LightHeader,
        MeshHeader, ModelHeader, NodeHeader, SaberHeader, SkinHeader, MODEL_DATA_OFFSET,
        NODE_HEADER_SIZE,
    },
};

/// Deepest node nesting accepted before the file is considered corrupt
pub const MAX_NODE_DEPTH: usize = 512;

/// Channel offsets used when a mesh declares a channel as absent
const DEFAULT_NORMAL_OFFSET: u32 = 12;
const DEFAULT_UV_OFFSET: u32 = 24;

/// Reader over an MDL stream and its MDX companion
pub struct ModelReader<M, X> {
    mdl: M,
    mdx: X,
    game: Game,
    names: Vec<String>,
}

impl<M: Read + Seek, X: Read + Seek> ModelReader<M, X> {
    pub fn new(mdl: M, mdx: X, game: Game) -> ModelReader<M, X> {
        ModelReader {
            mdl,
            mdx,
            game,
            names: Vec::new(),
        }
    }

    /// Decode the whole model, including its animations
    #[instrument(skip(self), fields(game = %self.game), err)]
    pub fn read_model(&mut self) -> Result<Model> {
        self.mdl.seek(SeekFrom::Start(0))?;
        let file = FileHeader::read(&mut self.mdl)?;
        if file.binary_flag != 0 {
            return Err(Error::TextFormatModel);
        }

        let geometry = GeometryHeader::read(&mut self.mdl)?;
        let header = ModelHeader::read(&mut self.mdl)?;
        let name = trim_nul(&geometry.name);
        debug!(
            name = %name,
            nodes = geometry.node_count,
            animations = header.animations.count,
            "model header"
        );

        self.names = self.read_names(header.names)?;

        let mut nodes = NodeTree::default();
        self.read_node_at(geometry.root_node_offset, None, &mut nodes, 0)?;

        let animation_offsets = self.mdl.peek_at(header.animations.position(), |r| {
            r.read_u32_array(header.animations.count as usize)
        })?;
        let animations = animation_offsets
            .into_iter()
            .map(|offset| self.read_animation(offset))
            .collect::<Result<Vec<_>>>()?;

        let super_model = trim_nul(&header.super_model);
        Ok(Model {
            name,
            super_model: (!super_model.is_empty() && !super_model.eq_ignore_ascii_case("null"))
                .then_some(super_model),
            classification: Classification::from_bits_retain(header.classification),
            bounds_min: Vec3::from_array(header.bounds_min),
            bounds_max: Vec3::from_array(header.bounds_max),
            radius: header.radius,
            scale: header.scale,
            child_model_count: header.child_model_count,
            raw_data_offset: file.raw_data_offset(),
            nodes,
            animations,
        })
    }

    pub fn into_inner(self) -> (M, X) {
        (self.mdl, self.mdx)
    }

    fn read_names(&mut self, names: ArrayDef) -> Result<Vec<String>> {
        let offsets = self
            .mdl
            .peek_at(names.position(), |r| r.read_u32_array(names.count as usize))?;

        offsets
            .into_iter()
            .map(|offset| {
                self.mdl
                    .peek_at(MODEL_DATA_OFFSET + offset as u64, |r| r.read_cstring())
                    .map_err(Error::from)
            })
            .collect()
    }

    fn read_animation(&mut self, offset: u32) -> Result<Animation> {
        let pos = MODEL_DATA_OFFSET + offset as u64;
        let header = self.mdl.peek_at(pos, |r| AnimationHeader::read(r))?;

        let events = self.mdl.peek_at(header.events.position(), |r| {
            (0..header.events.count)
                .map(|_| EventRecord::read(r))
                .collect::<binrw::BinResult<Vec<_>>>()
        })?;

        let mut nodes = NodeTree::default();
        self.read_node_at(header.geometry.root_node_offset, None, &mut nodes, 0)?;

        Ok(Animation {
            name: trim_nul(&header.geometry.name),
            length: header.length,
            transition: header.transition,
            anim_root: trim_nul(&header.anim_root),
            events: events
                .into_iter()
                .map(|e| Event {
                    time: e.time,
                    name: trim_nul(&e.name),
                })
                .collect(),
            nodes,
        })
    }

    /// Decode the node at `offset` and its subtree, returning its id
    fn read_node_at(
        &mut self,
        offset: u32,
        parent: Option<NodeId>,
        tree: &mut NodeTree,
        depth: usize,
    ) -> Result<NodeId> {
        if depth > MAX_NODE_DEPTH {
            return Err(Error::RecursionLimit(MAX_NODE_DEPTH));
        }

        let pos = MODEL_DATA_OFFSET + offset as u64;
        let header = self.mdl.peek_at(pos, |r| NodeHeader::read(r))?;
        let flags = NodeFlags::from_bits_retain(header.node_type);
        let name = self
            .names
            .get(header.name_index as usize)
            .cloned()
            .unwrap_or_default();

        let kind = self.read_kind(pos + NODE_HEADER_SIZE as u64, flags, &name)?;

        let keys = self.mdl.peek_at(header.curve_keys.position(), |r| {
            (0..header.curve_keys.count)
                .map(|_| CurveKey::read(r))
                .collect::<binrw::BinResult<Vec<_>>>()
        })?;
        let data = self.mdl.peek_at(header.curve_data.position(), |r| {
            r.read_u32_array(header.curve_data.count as usize)
        })?;
        let curves = decode_curves(&keys, &data, flags, &name)?;

        let [w, x, y, z] = header.orientation;
        let [px, py, pz] = header.position;
        let id = tree.push(ModelNode {
            name,
            flags,
            super_index: header.super_index,
            parent,
            children: Vec::new(),
            position: position_from_raw(px, py, pz),
            orientation: orientation_from_raw(x, y, z, w),
            curves,
            kind,
        });

        let child_offsets = self.mdl.peek_at(header.children.position(), |r| {
            r.read_u32_array(header.children.count as usize)
        })?;
        for child in child_offsets {
            let child_id = self.read_node_at(child, Some(id), tree, depth + 1)?;
            if let Some(node) = tree.get_mut(id) {
                node.children.push(child_id);
            }
        }

        Ok(id)
    }

    /// Decode the subtype trailer starting at `pos`
    fn read_kind(&mut self, pos: u64, flags: NodeFlags, name: &str) -> Result<NodeKind> {
        let tsl = self.game == Game::Tsl;
        self.mdl.seek(SeekFrom::Start(pos))?;

        if flags.contains(NodeFlags::SABER) {
            let header = MeshHeader::read_args(&mut self.mdl, (tsl,))?;
            let saber = SaberHeader::read(&mut self.mdl)?;
            let mut mesh = self.read_mesh(&header, name)?;
            let coords = MODEL_DATA_OFFSET + header.vertex_coords_offset as u64;
            mesh.vertices = self.mdl.peek_at(coords, |r| {
                (0..header.vertex_count)
                    .map(|_| {
                        let v = r.read_vec3()?;
                        Ok(position_from_raw(v.x, v.y, v.z))
                    })
                    .collect::<std::io::Result<Vec<_>>>()
            })?;
            return Ok(NodeKind::Saber(
                mesh,
                Saber {
                    vertex_coords_offset: saber.vertex_coords_offset,
                    tex_coords_offset: saber.tex_coords_offset,
                    saber_data_offset: saber.saber_data_offset,
                },
            ));
        }

        if flags.contains(NodeFlags::SKIN) {
            let header = MeshHeader::read_args(&mut self.mdl, (tsl,))?;
            let skin = SkinHeader::read(&mut self.mdl)?;
            let mesh = self.read_mesh(&header, name)?;
            let skin = self.read_skin(&header, &skin, mesh.vertices.len())?;
            return Ok(NodeKind::Skin(mesh, skin));
        }

        if flags.contains(NodeFlags::MESH) {
            let header = MeshHeader::read_args(&mut self.mdl, (tsl,))?;
            return Ok(NodeKind::Mesh(self.read_mesh(&header, name)?));
        }

        if flags.contains(NodeFlags::LIGHT) {
            let header = LightHeader::read(&mut self.mdl)?;
            return Ok(NodeKind::Light(self.read_light(&header)?));
        }

        Ok(NodeKind::Plain)
    }

    fn read_mesh(&mut self, header: &MeshHeader, name: &str) -> Result<Mesh> {
        let mut mesh = Mesh {
            bounds_min: Vec3::from_array(header.bounds_min),
            bounds_max: Vec3::from_array(header.bounds_max),
            radius: header.radius,
            average: Vec3::from_array(header.average),
            diffuse: Vec3::from_array(header.diffuse),
            ambient: Vec3::from_array(header.ambient),
            transparency_hint: header.transparency_hint,
            textures: [
                trim_nul(&header.texture_0),
                trim_nul(&header.texture_1),
                trim_nul(&header.texture_2),
                trim_nul(&header.texture_3),
            ],
            animate_uv: header.animate_uv != 0,
            uv_direction: Vec2::from_array(header.uv_direction),
            uv_jitter: header.uv_jitter,
            uv_jitter_speed: header.uv_jitter_speed,
            has_lightmap: header.has_lightmap != 0,
            rotate_texture: header.rotate_texture != 0,
            background_geometry: header.background_geometry != 0,
            shadow: header.shadow != 0,
            beaming: header.beaming != 0,
            render: header.render != 0,
            total_area: header.total_area,
            dirt: header.tsl.map(|t| Dirt {
                enabled: t.dirt_enabled != 0,
                texture: t.dirt_texture,
                coord_space: t.dirt_coord_space,
                hide_in_holograms: t.hide_in_holograms != 0,
            }),
            ..Default::default()
        };

        let vertex_count = header.vertex_count as usize;
        let face_count = header.faces.count as usize;
        if header.face_offsets.count == 0 || vertex_count == 0 || face_count == 0 {
            return Ok(mesh);
        }
        if header.face_offsets.count > 1 {
            warn!(
                node = name,
                arrays = header.face_offsets.count,
                "mesh has more than one face array, using the first"
            );
        }

        let stride = header.mdx_data_size as usize;
        self.mdx
            .seek(SeekFrom::Start(header.mdx_node_data_offset as u64))?;
        let records = self.mdx.read_bytes(stride.saturating_mul(vertex_count))?;

        let channel = |declared: u32, fallback: u32| -> usize {
            let offset = if declared == u32::MAX { fallback } else { declared };
            offset as usize
        };
        let position_at = channel(header.mdx_vertex_offset, 0);
        let normal_at = channel(header.mdx_normal_offset, DEFAULT_NORMAL_OFFSET);
        let texture_count = (header.texture_count as usize).min(4);
        let uv_at: Vec<usize> = (0..texture_count)
            .map(|t| channel(header.mdx_uv_offsets[t], DEFAULT_UV_OFFSET + 8 * t as u32))
            .collect();

        mesh.uvs = vec![Vec::new(); texture_count];
        for record in records.chunks_exact(stride.max(1)).take(vertex_count) {
            mesh.vertices.push(remap_vec3(record, position_at)?);
            mesh.normals.push(-remap_vec3(record, normal_at)?);
            for (set, &at) in mesh.uvs.iter_mut().zip(&uv_at) {
                set.push(Vec2::new(f32_at(record, at)?, f32_at(record, at + 4)?));
            }
        }

        let faces_at = self.mdl.peek_at(header.face_offsets.position(), |r| {
            r.read_u32::<LittleEndian>()
        })?;
        mesh.faces = self
            .mdl
            .peek_at(MODEL_DATA_OFFSET + faces_at as u64, |r| -> Result<_> {
                (0..face_count)
                    .map(|_| {
                        let a = r.read_u16::<LittleEndian>()?;
                        let b = r.read_u16::<LittleEndian>()?;
                        let c = r.read_u16::<LittleEndian>()?;
                        Ok([a, c, b])
                    })
                    .collect()
            })?;

        Ok(mesh)
    }

    fn read_skin(&mut self, mesh: &MeshHeader, header: &SkinHeader, vertices: usize) -> Result<Skin> {
        let stride = mesh.mdx_data_size as usize;
        self.mdx
            .seek(SeekFrom::Start(mesh.mdx_node_data_offset as u64))?;
        let records = self.mdx.read_bytes(stride.saturating_mul(vertices))?;

        let weights_at = header.mdx_weights_offset as usize;
        let bones_at = header.mdx_bones_offset as usize;
        let mut weights = Vec::with_capacity(vertices);
        for record in records.chunks_exact(stride.max(1)).take(vertices) {
            let mut weight = BoneWeight::default();
            for i in 0..4 {
                weight.weights[i] = f32_at(record, weights_at + 4 * i)?;
                weight.bones[i] = f32_at(record, bones_at + 4 * i)? as i32;
            }
            weights.push(weight);
        }

        let node_to_bone = self
            .mdl
            .peek_at(MODEL_DATA_OFFSET + header.bone_map_offset as u64, |r| {
                r.read_f32_array(header.bone_map_count as usize)
            })?;

        let bone_orientations = self.mdl.peek_at(header.bone_orientations.position(), |r| {
            (0..header.bone_orientations.count)
                .map(|_| {
                    let raw = r.read_f32_array(4)?;
                    Ok(Quat::from_xyzw(raw[1], raw[2], raw[3], raw[0]).normalize())
                })
                .collect::<std::io::Result<Vec<_>>>()
        })?;

        let bone_positions = self.mdl.peek_at(header.bone_positions.position(), |r| {
            (0..header.bone_positions.count)
                .map(|_| {
                    let v = r.read_vec3()?;
                    Ok(position_from_raw(v.x, v.y, v.z))
                })
                .collect::<std::io::Result<Vec<_>>>()
        })?;

        Ok(Skin {
            weights,
            node_to_bone,
            bone_to_node: header.bone_to_node,
            bone_orientations,
            bone_positions,
        })
    }

    fn read_light(&mut self, header: &LightHeader) -> Result<Light> {
        let flare_sizes = self.mdl.peek_at(header.flare_sizes.position(), |r| {
            r.read_f32_array(header.flare_sizes.count as usize)
        })?;
        let flare_positions = self.mdl.peek_at(header.flare_positions.position(), |r| {
            r.read_f32_array(header.flare_positions.count as usize)
        })?;
        let flare_color_shifts = self.mdl.peek_at(header.flare_color_shifts.position(), |r| {
            (0..header.flare_color_shifts.count)
                .map(|_| r.read_vec3())
                .collect::<std::io::Result<Vec<_>>>()
        })?;
        let texture_offsets = self.mdl.peek_at(header.flare_textures.position(), |r| {
            r.read_u32_array(header.flare_textures.count as usize)
        })?;
        let flare_textures = texture_offsets
            .into_iter()
            .map(|offset| {
                self.mdl
                    .peek_at(MODEL_DATA_OFFSET + offset as u64, |r| r.read_cstring())
                    .map_err(Error::from)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Light {
            flare_radius: header.flare_radius,
            flare_sizes,
            flare_positions,
            flare_color_shifts,
            flare_textures,
            priority: header.priority,
            ambient_only: header.ambient_only != 0,
            dynamic_type: header.dynamic_type,
            affect_dynamic: header.affect_dynamic != 0,
            shadow: header.shadow != 0,
            generate_flare: header.generate_flare != 0,
            fading_light: header.fading_light != 0,
        })
    }
}

/// Little endian float at `offset` of an MDX record
fn f32_at(record: &[u8], offset: usize) -> Result<f32> {
    let mut bytes = record.get(offset..).unwrap_or_default();
    Ok(bytes.read_f32::<LittleEndian>()?)
}

/// Axis remapped vector at `offset` of an MDX record
fn remap_vec3(record: &[u8], offset: usize) -> Result<Vec3> {
    Ok(position_from_raw(
        f32_at(record, offset)?,
        f32_at(record, offset + 4)?,
        f32_at(record, offset + 8)?,
    ))
}
