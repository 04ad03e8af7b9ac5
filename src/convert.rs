//! Shader conversion engine: parses GLSL with naga, validates the module and
//! re-emits it as WGSL or GLSL. This is what the Optimizer pane's "Convert"
//! button and the headless CLI both call into.

use anyhow::{anyhow, Result};

/// Shader stage of the source being converted.
///
/// `config_name()` values are stable; they are written into `.glo` project
/// files and must never change meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ShaderStage {
    Vertex,
    #[default]
    Fragment,
    Compute,
}

impl ShaderStage {
    pub const ALL: &'static [ShaderStage] =
        &[ShaderStage::Vertex, ShaderStage::Fragment, ShaderStage::Compute];

    pub fn label(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "Vertex",
            ShaderStage::Fragment => "Fragment",
            ShaderStage::Compute => "Compute",
        }
    }

    pub fn config_name(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Compute => "compute",
        }
    }

    /// Unknown names fall back to the default (tolerant config parsing).
    pub fn from_config_name(name: &str) -> Self {
        match name {
            "vertex" => ShaderStage::Vertex,
            "compute" => ShaderStage::Compute,
            _ => ShaderStage::Fragment,
        }
    }

    fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
            ShaderStage::Compute => naga::ShaderStage::Compute,
        }
    }
}

/// GLSL dialect emitted when the language target is GLSL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ApiTarget {
    #[default]
    OpenGl330Core,
    OpenGl450Core,
    OpenGlEs300,
    OpenGlEs310,
}

impl ApiTarget {
    pub const ALL: &'static [ApiTarget] = &[
        ApiTarget::OpenGl330Core,
        ApiTarget::OpenGl450Core,
        ApiTarget::OpenGlEs300,
        ApiTarget::OpenGlEs310,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ApiTarget::OpenGl330Core => "OpenGL 3.3 Core",
            ApiTarget::OpenGl450Core => "OpenGL 4.5 Core",
            ApiTarget::OpenGlEs300 => "OpenGL ES 3.0",
            ApiTarget::OpenGlEs310 => "OpenGL ES 3.1",
        }
    }

    pub fn config_name(&self) -> &'static str {
        match self {
            ApiTarget::OpenGl330Core => "gl330core",
            ApiTarget::OpenGl450Core => "gl450core",
            ApiTarget::OpenGlEs300 => "gles300",
            ApiTarget::OpenGlEs310 => "gles310",
        }
    }

    pub fn from_config_name(name: &str) -> Self {
        match name {
            "gl450core" => ApiTarget::OpenGl450Core,
            "gles300" => ApiTarget::OpenGlEs300,
            "gles310" => ApiTarget::OpenGlEs310,
            _ => ApiTarget::OpenGl330Core,
        }
    }

    fn glsl_version(&self) -> naga::back::glsl::Version {
        match self {
            ApiTarget::OpenGl330Core => naga::back::glsl::Version::Desktop(330),
            ApiTarget::OpenGl450Core => naga::back::glsl::Version::Desktop(450),
            ApiTarget::OpenGlEs300 => naga::back::glsl::Version::Embedded {
                version: 300,
                is_webgl: false,
            },
            ApiTarget::OpenGlEs310 => naga::back::glsl::Version::Embedded {
                version: 310,
                is_webgl: false,
            },
        }
    }
}

/// Output language of the conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LanguageTarget {
    #[default]
    Glsl,
    Wgsl,
}

impl LanguageTarget {
    pub const ALL: &'static [LanguageTarget] = &[LanguageTarget::Glsl, LanguageTarget::Wgsl];

    pub fn label(&self) -> &'static str {
        match self {
            LanguageTarget::Glsl => "GLSL",
            LanguageTarget::Wgsl => "WGSL",
        }
    }

    pub fn config_name(&self) -> &'static str {
        match self {
            LanguageTarget::Glsl => "glsl",
            LanguageTarget::Wgsl => "wgsl",
        }
    }

    pub fn from_config_name(name: &str) -> Self {
        match name {
            "wgsl" => LanguageTarget::Wgsl,
            _ => LanguageTarget::Glsl,
        }
    }

    /// File extension used by the Target pane's export dialog and the CLI.
    pub fn extension(&self) -> &'static str {
        match self {
            LanguageTarget::Glsl => "glsl",
            LanguageTarget::Wgsl => "wgsl",
        }
    }
}

/// Emission options persisted in the project file and edited in the
/// Optimizer pane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptimizationOptions {
    /// Keep globals and functions the entry point never reaches.
    pub keep_unused: bool,
    /// WGSL only: spell out types that could be inferred.
    pub explicit_types: bool,
    /// Zero-initialize workgroup memory in compute shaders.
    pub zero_init_workgroup: bool,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self {
            keep_unused: false,
            explicit_types: false,
            zero_init_workgroup: true,
        }
    }
}

/// Convert `source` (GLSL) to the requested language target.
///
/// The pipeline is parse → validate → emit; any failure carries enough context
/// to show in the status bar or on stderr.
pub fn convert(
    source: &str,
    stage: ShaderStage,
    api: ApiTarget,
    lang: LanguageTarget,
    opts: &OptimizationOptions,
) -> Result<String> {
    let mut frontend = naga::front::glsl::Frontend::default();
    let options = naga::front::glsl::Options::from(stage.to_naga());

    let module = frontend.parse(&options, source).map_err(|errors| {
        let messages: Vec<String> = errors
            .errors
            .iter()
            .map(|e| format!("  {:?}", e.kind))
            .collect();
        anyhow!("GLSL parse error:\n{}", messages.join("\n"))
    })?;

    let info = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| anyhow!("shader validation failed: {:?}", e))?;

    match lang {
        LanguageTarget::Wgsl => emit_wgsl(&module, &info, opts),
        LanguageTarget::Glsl => emit_glsl(&module, &info, stage, api, opts),
    }
}

fn emit_wgsl(
    module: &naga::Module,
    info: &naga::valid::ModuleInfo,
    opts: &OptimizationOptions,
) -> Result<String> {
    let flags = if opts.explicit_types {
        naga::back::wgsl::WriterFlags::EXPLICIT_TYPES
    } else {
        naga::back::wgsl::WriterFlags::empty()
    };

    let mut out = String::new();
    let mut writer = naga::back::wgsl::Writer::new(&mut out, flags);
    writer
        .write(module, info)
        .map_err(|e| anyhow!("WGSL generation failed: {:?}", e))?;
    Ok(out)
}

fn emit_glsl(
    module: &naga::Module,
    info: &naga::valid::ModuleInfo,
    stage: ShaderStage,
    api: ApiTarget,
    opts: &OptimizationOptions,
) -> Result<String> {
    let mut writer_flags = naga::back::glsl::WriterFlags::empty();
    if opts.keep_unused {
        writer_flags |= naga::back::glsl::WriterFlags::INCLUDE_UNUSED_ITEMS;
    }

    let options = naga::back::glsl::Options {
        version: api.glsl_version(),
        writer_flags,
        zero_initialize_workgroup_memory: opts.zero_init_workgroup,
        ..Default::default()
    };
    let pipeline_options = naga::back::glsl::PipelineOptions {
        shader_stage: stage.to_naga(),
        // The GLSL frontend always produces an entry point named "main".
        entry_point: "main".to_string(),
        multiview: None,
    };

    let mut out = String::new();
    let mut writer = naga::back::glsl::Writer::new(
        &mut out,
        module,
        info,
        &options,
        &pipeline_options,
        naga::proc::BoundsCheckPolicies::default(),
    )
    .map_err(|e| anyhow!("GLSL writer setup failed: {:?}", e))?;
    writer
        .write()
        .map_err(|e| anyhow!("GLSL generation failed: {:?}", e))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENT_SRC: &str = "#version 450\n\
        layout(location = 0) out vec4 color;\n\
        void main() { color = vec4(1.0, 0.5, 0.25, 1.0); }\n";

    const VERTEX_SRC: &str = "#version 450\n\
        void main() { gl_Position = vec4(0.0, 0.0, 0.0, 1.0); }\n";

    #[test]
    fn fragment_to_wgsl() {
        let out = convert(
            FRAGMENT_SRC,
            ShaderStage::Fragment,
            ApiTarget::default(),
            LanguageTarget::Wgsl,
            &OptimizationOptions::default(),
        )
        .unwrap();
        assert!(out.contains("fn main"));
    }

    #[test]
    fn fragment_to_glsl_desktop() {
        let out = convert(
            FRAGMENT_SRC,
            ShaderStage::Fragment,
            ApiTarget::OpenGl330Core,
            LanguageTarget::Glsl,
            &OptimizationOptions::default(),
        )
        .unwrap();
        assert!(out.contains("#version 330"));
    }

    #[test]
    fn vertex_to_wgsl() {
        let out = convert(
            VERTEX_SRC,
            ShaderStage::Vertex,
            ApiTarget::default(),
            LanguageTarget::Wgsl,
            &OptimizationOptions::default(),
        )
        .unwrap();
        assert!(out.contains("@vertex"));
    }

    #[test]
    fn invalid_source_reports_parse_error() {
        let err = convert(
            "this is not a shader",
            ShaderStage::Fragment,
            ApiTarget::default(),
            LanguageTarget::Wgsl,
            &OptimizationOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("parse error"));
    }

    #[test]
    fn config_names_round_trip() {
        for stage in ShaderStage::ALL {
            assert_eq!(*stage, ShaderStage::from_config_name(stage.config_name()));
        }
        for api in ApiTarget::ALL {
            assert_eq!(*api, ApiTarget::from_config_name(api.config_name()));
        }
        for lang in LanguageTarget::ALL {
            assert_eq!(*lang, LanguageTarget::from_config_name(lang.config_name()));
        }
    }

    #[test]
    fn unknown_config_names_fall_back_to_defaults() {
        assert_eq!(ShaderStage::from_config_name("geometry"), ShaderStage::default());
        assert_eq!(ApiTarget::from_config_name("directx"), ApiTarget::default());
        assert_eq!(LanguageTarget::from_config_name("hlsl"), LanguageTarget::default());
    }
}
