#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;
use std::sync::Arc;

use glam::{Quat, Vec3};
use gltf::animation::Property;
use gltf::animation::util::ReadOutputs;

use crate::animation::{
    AnimationClip, InterpolationMode, KeyframeTrack, MorphWeightData, TargetPath, Track,
    TrackData, TrackMeta,
};
use crate::assets::ModelAsset;
use crate::assets::io;
use crate::errors::{Result, StageError};
use crate::scene::{
    BoundingBox, CameraProjection, LightDesc, LightKind, Node, NodeHandle, NodeKind, Scene,
};

/// Name of the group node that parents a loaded model.
pub const MODEL_ROOT_NAME: &str = "model_root";

/// Imports glTF 2.0 models into a [`Scene`].
///
/// The model's nodes end up under a detached group named [`MODEL_ROOT_NAME`];
/// the caller decides when to add it to the host. Every failure is reported
/// as [`StageError::AssetLoad`].
pub struct GltfLoader;

impl GltfLoader {
    /// Reads a `.gltf` or `.glb` file together with its external buffers.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn load(path: impl AsRef<Path>, scene: &mut Scene) -> Result<ModelAsset> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let name = io::source_filename(&display).to_string();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| StageError::asset_load(&display, e))?;
        let gltf = gltf::Gltf::from_slice(&bytes).map_err(|e| StageError::asset_load(&display, e))?;

        let reader = io::FileAssetReader::new(path);
        let mut buffers = Vec::with_capacity(gltf.buffers().count());
        for buffer in gltf.buffers() {
            let data = match buffer.source() {
                gltf::buffer::Source::Uri(uri) if !uri.starts_with("data:") => reader
                    .read_bytes(uri)
                    .await
                    .map_err(|e| StageError::asset_load(&display, format!("buffer '{uri}': {e}")))?,
                _ => resolve_embedded_buffer(&gltf, &buffer)
                    .map_err(|e| StageError::asset_load(&display, e))?,
            };
            buffers.push(data);
        }

        Self::build(&name, &gltf, &buffers, scene).map_err(|e| StageError::asset_load(&display, e))
    }

    /// Parses a model held in memory. Buffers must be the GLB binary chunk
    /// or base64 data URIs.
    pub fn load_from_slice(bytes: &[u8], scene: &mut Scene) -> Result<ModelAsset> {
        Self::load_named_slice("<memory>", bytes, scene)
    }

    /// Same as [`GltfLoader::load_from_slice`] with a name for logs and errors.
    pub fn load_named_slice(name: &str, bytes: &[u8], scene: &mut Scene) -> Result<ModelAsset> {
        Self::import_slice(name, bytes, scene).map_err(|e| StageError::asset_load(name, e))
    }

    fn import_slice(name: &str, bytes: &[u8], scene: &mut Scene) -> Result<ModelAsset> {
        let gltf = gltf::Gltf::from_slice(bytes)?;
        let buffers = gltf
            .buffers()
            .map(|buffer| resolve_embedded_buffer(&gltf, &buffer))
            .collect::<Result<Vec<_>>>()?;
        Self::build(name, &gltf, &buffers, scene)
    }

    fn build(
        name: &str,
        gltf: &gltf::Gltf,
        buffers: &[Vec<u8>],
        scene: &mut Scene,
    ) -> Result<ModelAsset> {
        for buffer in gltf.buffers() {
            let actual = buffers.get(buffer.index()).map_or(0, Vec::len);
            if actual < buffer.length() {
                return Err(StageError::Gltf(format!(
                    "buffer {} holds {actual} bytes, {} expected",
                    buffer.index(),
                    buffer.length()
                )));
            }
        }

        let gltf_scene = gltf
            .default_scene()
            .or_else(|| gltf.scenes().next())
            .ok_or_else(|| StageError::Gltf("document has no scene".into()))?;

        // Nodes first, hierarchy second: children may precede their parents.
        let handles: Vec<NodeHandle> = gltf
            .nodes()
            .map(|node| scene.create_node(convert_node(&node)))
            .collect();

        let root = scene.create_node(Node::new(MODEL_ROOT_NAME));
        for node in gltf.nodes() {
            for child in node.children() {
                scene.attach(handles[child.index()], handles[node.index()]);
            }
        }
        for node in gltf_scene.nodes() {
            scene.attach(handles[node.index()], root);
        }

        // Drop nodes that are not part of the displayed scene.
        for &handle in &handles {
            let orphan = scene.get_node(handle).is_some_and(|n| n.parent().is_none());
            if orphan {
                scene.remove_subtree(handle);
            }
        }

        let clips = load_animations(gltf, buffers);

        log::info!(
            "Loaded '{name}': {} node(s), {} animation(s)",
            handles.len(),
            clips.len()
        );

        Ok(ModelAsset {
            name: name.to_string(),
            root,
            clips,
        })
    }
}

fn resolve_embedded_buffer(gltf: &gltf::Gltf, buffer: &gltf::Buffer<'_>) -> Result<Vec<u8>> {
    match buffer.source() {
        gltf::buffer::Source::Bin => gltf
            .blob
            .clone()
            .ok_or_else(|| StageError::Gltf("missing GLB binary chunk".into())),
        gltf::buffer::Source::Uri(uri) => io::decode_data_uri(uri).unwrap_or_else(|| {
            Err(StageError::Gltf(format!(
                "external buffer '{uri}' cannot be resolved from memory"
            )))
        }),
    }
}

fn node_name(node: &gltf::Node<'_>) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), str::to_string)
}

fn convert_node(node: &gltf::Node<'_>) -> Node {
    let kind = if let Some(mesh) = node.mesh() {
        let mut bounds = BoundingBox::EMPTY;
        for primitive in mesh.primitives() {
            let b = primitive.bounding_box();
            bounds = bounds.union(&BoundingBox::new(Vec3::from_array(b.min), Vec3::from_array(b.max)));
        }
        NodeKind::Mesh {
            local_bounds: (!bounds.is_empty()).then_some(bounds),
        }
    } else if let Some(camera) = node.camera() {
        NodeKind::Camera(match camera.projection() {
            gltf::camera::Projection::Perspective(p) => CameraProjection {
                fov_y_degrees: p.yfov().to_degrees(),
                near: p.znear(),
                far: p.zfar(),
            },
            // Orthographic cameras carry no field of view.
            gltf::camera::Projection::Orthographic(o) => CameraProjection {
                fov_y_degrees: 0.0,
                near: o.znear(),
                far: Some(o.zfar()),
            },
        })
    } else if let Some(light) = node.light() {
        use gltf::khr_lights_punctual::Kind;
        NodeKind::Light(LightDesc {
            kind: match light.kind() {
                Kind::Directional => LightKind::Directional,
                Kind::Point => LightKind::Point,
                Kind::Spot { .. } => LightKind::Spot,
            },
            color: Vec3::from_array(light.color()),
            intensity: light.intensity(),
        })
    } else {
        NodeKind::Group
    };

    let mut engine_node = Node::with_kind(node_name(node), kind);

    let (t, r, s) = node.transform().decomposed();
    engine_node.transform.position = Vec3::from_array(t);
    engine_node.transform.rotation = Quat::from_array(r);
    engine_node.transform.scale = Vec3::from_array(s);

    if let Some(mesh) = node.mesh() {
        let target_count = mesh
            .primitives()
            .map(|p| p.morph_targets().len())
            .max()
            .unwrap_or(0);
        engine_node.morph_weights = match node.weights().or_else(|| mesh.weights()) {
            Some(weights) => weights.to_vec(),
            None => vec![0.0; target_count],
        };
    }

    engine_node
}

fn load_animations(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Vec<Arc<AnimationClip>> {
    let mut clips = Vec::with_capacity(gltf.animations().count());

    for anim in gltf.animations() {
        let clip_name = anim
            .name()
            .map_or_else(|| format!("anim_{}", anim.index()), str::to_string);
        let mut tracks = Vec::new();

        for (channel_index, channel) in anim.channels().enumerate() {
            let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
            let target = channel.target();
            let node_name = node_name(&target.node());

            let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs()) else {
                log::warn!(
                    "Animation '{clip_name}': channel {channel_index} on '{node_name}' has no readable data, skipped"
                );
                continue;
            };
            let times: Vec<f32> = inputs.collect();

            let interpolation = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                gltf::animation::Interpolation::Step => InterpolationMode::Step,
                gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
            };

            let (target_path, data) = match (target.property(), outputs) {
                (Property::Translation, ReadOutputs::Translations(iter)) => (
                    TargetPath::Translation,
                    TrackData::Vector3(KeyframeTrack::new(
                        times,
                        iter.map(Vec3::from_array).collect(),
                        interpolation,
                    )),
                ),
                (Property::Rotation, ReadOutputs::Rotations(iter)) => (
                    TargetPath::Rotation,
                    TrackData::Quaternion(KeyframeTrack::new(
                        times,
                        iter.into_f32().map(Quat::from_array).collect(),
                        interpolation,
                    )),
                ),
                (Property::Scale, ReadOutputs::Scales(iter)) => (
                    TargetPath::Scale,
                    TrackData::Vector3(KeyframeTrack::new(
                        times,
                        iter.map(Vec3::from_array).collect(),
                        interpolation,
                    )),
                ),
                (Property::MorphTargetWeights, ReadOutputs::MorphTargetWeights(iter)) => {
                    let flat: Vec<f32> = iter.into_f32().collect();
                    let values_per_key = match interpolation {
                        InterpolationMode::CubicSpline => 3,
                        InterpolationMode::Linear | InterpolationMode::Step => 1,
                    };
                    let value_count = times.len() * values_per_key;
                    if value_count == 0 || flat.is_empty() || flat.len() % value_count != 0 {
                        log::warn!(
                            "Animation '{clip_name}': morph weights on '{node_name}' do not match keyframes, skipped"
                        );
                        continue;
                    }
                    let targets = flat.len() / value_count;
                    let values = flat.chunks(targets).map(MorphWeightData::from_slice).collect();
                    (
                        TargetPath::Weights,
                        TrackData::MorphWeights(KeyframeTrack::new(times, values, interpolation)),
                    )
                }
                (property, _) => {
                    log::warn!(
                        "Animation '{clip_name}': output type does not match {property:?} on '{node_name}', skipped"
                    );
                    continue;
                }
            };

            let well_formed = match &data {
                TrackData::Vector3(t) => t.is_well_formed(),
                TrackData::Quaternion(t) => t.is_well_formed(),
                TrackData::Scalar(t) => t.is_well_formed(),
                TrackData::MorphWeights(t) => t.is_well_formed(),
            };
            if !well_formed {
                log::warn!(
                    "Animation '{clip_name}': {target_path:?} track on '{node_name}' is malformed, skipped"
                );
                continue;
            }

            tracks.push(Track {
                meta: TrackMeta {
                    node_name,
                    target: target_path,
                },
                data,
            });
        }

        clips.push(Arc::new(AnimationClip::new(clip_name, tracks)));
    }

    clips
}
