//! Shader pipeline loader.
//!
//! A `.shader` resource holds both pipeline stages in one text file, with
//! `#shader vertex` / `#shader fragment` marker lines introducing each
//! section. Loading goes split -> compile -> link: the split is pure text
//! handling, compilation runs each stage through naga (the same front end
//! wgpu uses) for device-free diagnostics, and linking consumes both stages
//! into a render pipeline.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

const SECTION_MARKER: &str = "#shader";

/// One of the two programmable stages in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }

    /// Entry point the stage source must define.
    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }

    fn naga_stage(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure from any step of the loader.
#[derive(Debug)]
pub enum ShaderError {
    Io { path: PathBuf, source: io::Error },
    Compile { stage: ShaderStage, log: String },
    Link { log: String },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Io { path, source } => {
                write!(f, "failed to read shader file {}: {}", path.display(), source)
            }
            ShaderError::Compile { stage, log } => {
                write!(f, "failed to compile {} shader:\n{}", stage, log)
            }
            ShaderError::Link { log } => write!(f, "failed to link shader program: {}", log),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShaderError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// The two stage sources recovered from a tagged `.shader` resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    /// Splits tagged text into per-stage source buffers.
    ///
    /// Lines before the first marker are discarded, as are lines following a
    /// marker with an unrecognized stage name. Sections may appear in either
    /// order. A repeated marker resets that stage's accumulation, so the last
    /// occurrence wins.
    pub fn parse(input: &str) -> Self {
        let mut vertex = String::new();
        let mut fragment = String::new();
        let mut current: Option<ShaderStage> = None;

        for line in input.lines() {
            let trimmed = line.trim_start();
            if let Some(rest) = trimmed.strip_prefix(SECTION_MARKER) {
                current = match rest.trim() {
                    "vertex" => {
                        vertex.clear();
                        Some(ShaderStage::Vertex)
                    }
                    "fragment" => {
                        fragment.clear();
                        Some(ShaderStage::Fragment)
                    }
                    other => {
                        warn!("ignoring unknown shader section {:?}", other);
                        None
                    }
                };
                continue;
            }
            match current {
                Some(ShaderStage::Vertex) => {
                    vertex.push_str(line);
                    vertex.push('\n');
                }
                Some(ShaderStage::Fragment) => {
                    fragment.push_str(line);
                    fragment.push('\n');
                }
                None => {}
            }
        }

        Self { vertex, fragment }
    }

    /// Reads and splits the resource at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded shader source from {}", path.display());
        Ok(Self::parse(&text))
    }
}

/// A single stage that has passed the naga front end.
///
/// Holding one of these means the source parsed, validated, and defines the
/// stage's entry point; handing it to [`ShaderProgram::link`] gives it up for
/// good, so a stage object cannot be touched after the program exists.
#[derive(Debug)]
pub struct CompiledStage {
    stage: ShaderStage,
    source: String,
}

impl CompiledStage {
    pub fn compile(stage: ShaderStage, source: &str) -> Result<Self, ShaderError> {
        let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
            stage,
            log: e.emit_to_string(source),
        })?;

        let entry = stage.entry_point();
        let has_entry = module
            .entry_points
            .iter()
            .any(|ep| ep.stage == stage.naga_stage() && ep.name == entry);
        if !has_entry {
            return Err(ShaderError::Compile {
                stage,
                log: format!("missing `{}` entry point", entry),
            });
        }

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::default(),
        )
        .validate(&module)
        .map_err(|e| ShaderError::Compile {
            stage,
            log: e.into_inner().to_string(),
        })?;

        debug!("compiled {} shader ({} bytes)", stage, source.len());
        Ok(Self {
            stage,
            source: source.to_owned(),
        })
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

/// A linked render pipeline. Dropping it releases the GPU program.
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
}

impl ShaderProgram {
    /// Links both stages into a pipeline targeting `format`.
    ///
    /// The stage objects are consumed and dropped here; the pipeline retains
    /// their compiled output. Driver-side validation failures are captured
    /// through an error scope rather than wgpu's default panic handler.
    pub fn link(
        device: &wgpu::Device,
        vertex: CompiledStage,
        fragment: CompiledStage,
        format: wgpu::TextureFormat,
        buffers: &[wgpu::VertexBufferLayout],
    ) -> Result<Self, ShaderError> {
        if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
            return Err(ShaderError::Link {
                log: format!(
                    "stage mismatch: got {} and {} stages",
                    vertex.stage, fragment.stage
                ),
            });
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Vertex Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Owned(vertex.source)),
        });
        let fs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Fragment Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Owned(fragment.source)),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shader Program Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shader Program"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: ShaderStage::Vertex.entry_point(),
                buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: ShaderStage::Fragment.entry_point(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Link {
                log: err.to_string(),
            });
        }

        Ok(Self { pipeline })
    }

    /// Runs the whole pipeline for the resource at `path`:
    /// load -> split -> compile both stages -> link.
    pub fn from_path(
        device: &wgpu::Device,
        path: impl AsRef<Path>,
        format: wgpu::TextureFormat,
        buffers: &[wgpu::VertexBufferLayout],
    ) -> Result<Self, ShaderError> {
        let source = ShaderSource::load(path)?;
        let vs = CompiledStage::compile(ShaderStage::Vertex, &source.vertex)?;
        let fs = CompiledStage::compile(ShaderStage::Fragment, &source.fragment)?;
        Self::link(device, vs, fs, format, buffers)
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = "@vertex\nfn vs_main(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {\n    return vec4<f32>(position, 0.0, 1.0);\n}\n";
    const FS: &str = "@fragment\nfn fs_main() -> @location(0) vec4<f32> {\n    return vec4<f32>(1.0, 1.0, 1.0, 1.0);\n}\n";

    #[test]
    fn split_round_trips_both_sections() {
        let input = format!("#shader vertex\n{}#shader fragment\n{}", VS, FS);
        let source = ShaderSource::parse(&input);
        assert_eq!(source.vertex, VS);
        assert_eq!(source.fragment, FS);
    }

    #[test]
    fn reversed_section_order_assigns_correct_stages() {
        let input = format!("#shader fragment\n{}#shader vertex\n{}", FS, VS);
        let source = ShaderSource::parse(&input);
        assert_eq!(source.vertex, VS);
        assert_eq!(source.fragment, FS);
    }

    #[test]
    fn no_markers_yields_empty_buffers() {
        let source = ShaderSource::parse("void main() {}\n// stray comment\n");
        assert!(source.vertex.is_empty());
        assert!(source.fragment.is_empty());
    }

    #[test]
    fn minimal_two_section_input() {
        let source = ShaderSource::parse("#shader vertex\nA\n#shader fragment\nB\n");
        assert_eq!(source.vertex, "A\n");
        assert_eq!(source.fragment, "B\n");
    }

    #[test]
    fn leading_unmarked_content_is_discarded() {
        let source = ShaderSource::parse("// preamble\nstray\n#shader vertex\nA\n");
        assert_eq!(source.vertex, "A\n");
        assert!(source.fragment.is_empty());
    }

    #[test]
    fn repeated_marker_resets_accumulation() {
        let source =
            ShaderSource::parse("#shader vertex\nold\n#shader fragment\nB\n#shader vertex\nnew\n");
        assert_eq!(source.vertex, "new\n");
        assert_eq!(source.fragment, "B\n");
    }

    #[test]
    fn unknown_stage_marker_discards_following_lines() {
        let source = ShaderSource::parse("#shader geometry\nG\n#shader vertex\nA\n");
        assert_eq!(source.vertex, "A\n");
        assert!(source.fragment.is_empty());
        assert!(!source.vertex.contains('G'));
    }

    #[test]
    fn empty_input_yields_empty_buffers() {
        assert_eq!(ShaderSource::parse(""), ShaderSource::default());
    }

    #[test]
    fn valid_stage_sources_compile() {
        CompiledStage::compile(ShaderStage::Vertex, VS).unwrap();
        CompiledStage::compile(ShaderStage::Fragment, FS).unwrap();
    }

    #[test]
    fn invalid_source_reports_stage_and_diagnostic() {
        let err = CompiledStage::compile(ShaderStage::Vertex, "this is not wgsl").unwrap_err();
        match err {
            ShaderError::Compile { stage, log } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(!log.is_empty());
            }
            other => panic!("expected compile error, got {:?}", other),
        }
    }

    #[test]
    fn missing_entry_point_is_a_compile_error() {
        // Valid WGSL, but it defines the wrong stage's entry point.
        let err = CompiledStage::compile(ShaderStage::Vertex, FS).unwrap_err();
        match err {
            ShaderError::Compile { stage, log } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(log.contains("vs_main"));
            }
            other => panic!("expected compile error, got {:?}", other),
        }
    }

    #[test]
    fn error_display_names_the_failing_stage() {
        let err = CompiledStage::compile(ShaderStage::Fragment, "@@@").unwrap_err();
        assert!(err.to_string().contains("fragment"));
    }

    #[test]
    fn bundled_resource_splits_and_compiles() {
        let source = ShaderSource::parse(include_str!("../../../res/shaders/basic.shader"));
        CompiledStage::compile(ShaderStage::Vertex, &source.vertex).unwrap();
        CompiledStage::compile(ShaderStage::Fragment, &source.fragment).unwrap();
    }
}
