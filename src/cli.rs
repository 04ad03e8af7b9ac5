//! Headless conversion mode.
//!
//! `glslopt --input shader.frag --language wgsl --output shader.wgsl` converts
//! a single file and exits without ever opening a window. Passing `--input`
//! (or `-i`) is what selects this mode.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use crate::convert::{self, ApiTarget, LanguageTarget, OptimizationOptions, ShaderStage};

#[derive(Parser, Debug)]
#[command(name = "glslopt", version, about = "Convert and optimize GLSL shaders")]
pub struct CliArgs {
    /// GLSL source file to convert. Enables headless mode.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Where to write the converted shader. Defaults to stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Shader stage of the input.
    #[arg(short, long, default_value = "fragment", value_parser = parse_stage)]
    pub stage: ShaderStage,

    /// Output language.
    #[arg(short, long, default_value = "glsl", value_parser = parse_language)]
    pub language: LanguageTarget,

    /// GLSL dialect, used when the output language is glsl.
    #[arg(short, long, default_value = "gl330core", value_parser = parse_api)]
    pub api: ApiTarget,

    /// Keep globals and functions the entry point never reaches.
    #[arg(long)]
    pub keep_unused: bool,

    /// Spell out inferable types in WGSL output.
    #[arg(long)]
    pub explicit_types: bool,

    /// Skip zero-initialization of workgroup memory in compute shaders.
    #[arg(long)]
    pub no_zero_init_workgroup: bool,
}

// The project-file readers fall back silently on unknown names; the CLI
// rejects them instead so a typo cannot convert to the wrong target.

fn parse_stage(s: &str) -> Result<ShaderStage, String> {
    let stage = ShaderStage::from_config_name(s);
    if stage.config_name() == s {
        Ok(stage)
    } else {
        Err(format!("unknown stage '{}' (vertex, fragment, compute)", s))
    }
}

fn parse_language(s: &str) -> Result<LanguageTarget, String> {
    let lang = LanguageTarget::from_config_name(s);
    if lang.config_name() == s {
        Ok(lang)
    } else {
        Err(format!("unknown language '{}' (glsl, wgsl)", s))
    }
}

fn parse_api(s: &str) -> Result<ApiTarget, String> {
    let api = ApiTarget::from_config_name(s);
    if api.config_name() == s {
        Ok(api)
    } else {
        Err(format!(
            "unknown api '{}' (gl330core, gl450core, gles300, gles310)",
            s
        ))
    }
}

/// `true` when the process should run headless instead of opening the GUI.
pub fn is_cli_mode() -> bool {
    std::env::args().any(|a| a == "-i" || a == "--input" || a.starts_with("--input="))
}

pub fn run(args: CliArgs) -> ExitCode {
    match execute(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: CliArgs) -> Result<()> {
    let input = args
        .input
        .ok_or_else(|| anyhow!("--input is required in headless mode"))?;
    let source = std::fs::read_to_string(&input)
        .with_context(|| format!("could not read {}", input.display()))?;

    let opts = OptimizationOptions {
        keep_unused: args.keep_unused,
        explicit_types: args.explicit_types,
        zero_init_workgroup: !args.no_zero_init_workgroup,
    };
    let converted = convert::convert(&source, args.stage, args.api, args.language, &opts)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, converted)
                .with_context(|| format!("could not write {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        None => print!("{}", converted),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_project_defaults() {
        let args = CliArgs::parse_from(["glslopt", "-i", "shader.frag"]);
        assert_eq!(args.stage, ShaderStage::default());
        assert_eq!(args.language, LanguageTarget::default());
        assert_eq!(args.api, ApiTarget::default());
        assert!(!args.keep_unused);
    }

    #[test]
    fn unknown_target_names_are_rejected() {
        assert!(CliArgs::try_parse_from(["glslopt", "-i", "a.frag", "-s", "geometry"]).is_err());
        assert!(CliArgs::try_parse_from(["glslopt", "-i", "a.frag", "-l", "hlsl"]).is_err());
        assert!(CliArgs::try_parse_from(["glslopt", "-i", "a.frag", "-a", "directx"]).is_err());
    }

    #[test]
    fn converts_a_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("demo.frag");
        let output = dir.path().join("demo.wgsl");
        std::fs::write(
            &input,
            "#version 450\nlayout(location = 0) out vec4 c;\nvoid main() { c = vec4(1.0); }\n",
        )
        .unwrap();

        let args = CliArgs::parse_from([
            "glslopt",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-l",
            "wgsl",
        ]);
        execute(args).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("fn main"));
    }

    #[test]
    fn missing_input_file_fails() {
        let args = CliArgs::parse_from(["glslopt", "-i", "/no/such/file.frag"]);
        let err = execute(args).unwrap_err();
        assert!(err.to_string().contains("could not read"));
    }
}
