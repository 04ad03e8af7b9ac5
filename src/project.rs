//! Project file (`.glo`): the shader source plus the conversion settings,
//! with the dirty flag the save-confirmation workflow keys off.

use std::path::{Path, PathBuf};

use crate::config::xml_escape;
use crate::convert::{ApiTarget, LanguageTarget, OptimizationOptions, ShaderStage};
use crate::{log_err, log_info};

/// Single open project. Created empty at startup, populated by
/// `new_project`/`load_as`, cleared on close.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectFile {
    /// `None` for unsaved/untitled projects.
    pub path: Option<PathBuf>,
    pub shader_stage: ShaderStage,
    pub api_target: ApiTarget,
    pub language_target: LanguageTarget,
    pub options: OptimizationOptions,
    /// GLSL source text, embedded in the project file.
    pub source: String,

    is_loaded: bool,
    never_saved: bool,
    changed: bool,
}

impl Default for ProjectFile {
    fn default() -> Self {
        Self {
            path: None,
            shader_stage: ShaderStage::default(),
            api_target: ApiTarget::default(),
            language_target: LanguageTarget::default(),
            options: OptimizationOptions::default(),
            source: String::new(),
            is_loaded: false,
            never_saved: true,
            changed: false,
        }
    }
}

impl ProjectFile {
    /// Reset to a fresh project. With a path, the empty project is written to
    /// disk immediately; without one it stays untitled until Save As.
    pub fn new_project(&mut self, path: Option<PathBuf>) {
        *self = Self {
            is_loaded: true,
            ..Self::default()
        };
        if let Some(p) = path {
            self.save_as(p);
        }
    }

    /// Load a project from `path`. Unknown XML content is ignored; fields
    /// missing from the file keep their defaults. Returns `false` (and logs)
    /// when the file cannot be read or is not well-formed XML.
    pub fn load_as(&mut self, path: PathBuf) -> bool {
        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                log_err!("failed to read project {}: {}", path.display(), e);
                return false;
            }
        };
        let doc = match roxmltree::Document::parse(&text) {
            Ok(d) => d,
            Err(e) => {
                log_err!("failed to parse project {}: {}", path.display(), e);
                return false;
            }
        };

        let mut loaded = Self {
            path: Some(path.clone()),
            is_loaded: true,
            never_saved: false,
            changed: false,
            ..Self::default()
        };
        for node in doc.root_element().children().filter(|n| n.is_element()) {
            match node.tag_name().name() {
                "stage" => {
                    if let Some(v) = node.attribute("value") {
                        loaded.shader_stage = ShaderStage::from_config_name(v);
                    }
                }
                "api" => {
                    if let Some(v) = node.attribute("value") {
                        loaded.api_target = ApiTarget::from_config_name(v);
                    }
                }
                "language" => {
                    if let Some(v) = node.attribute("value") {
                        loaded.language_target = LanguageTarget::from_config_name(v);
                    }
                }
                "optimization" => {
                    let mut o = OptimizationOptions::default();
                    if let Some(v) = node.attribute("keep_unused") {
                        o.keep_unused = v == "true";
                    }
                    if let Some(v) = node.attribute("explicit_types") {
                        o.explicit_types = v == "true";
                    }
                    if let Some(v) = node.attribute("zero_init_workgroup") {
                        o.zero_init_workgroup = v == "true";
                    }
                    loaded.options = o;
                }
                "source" => {
                    loaded.source = node.text().unwrap_or_default().to_string();
                }
                _ => {} // unknown elements are ignored
            }
        }

        *self = loaded;
        log_info!("project loaded: {}", path.display());
        true
    }

    /// Save to the current path. `false` when the project has never been
    /// saved (caller escalates to Save As) or the write fails.
    pub fn save(&mut self) -> bool {
        if self.never_saved {
            return false;
        }
        let Some(path) = self.path.clone() else {
            return false;
        };
        self.write_to(&path)
    }

    /// Save to `path`, which becomes the project's path on success.
    pub fn save_as(&mut self, path: PathBuf) -> bool {
        if !self.write_to(&path) {
            return false;
        }
        self.path = Some(path);
        self.never_saved = false;
        true
    }

    fn write_to(&mut self, path: &Path) -> bool {
        match std::fs::write(path, self.to_xml()) {
            Ok(()) => {
                self.changed = false;
                log_info!("project saved: {}", path.display());
                true
            }
            Err(e) => {
                log_err!("failed to save project {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Discard the project. The app falls back to its "no project" screen.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.changed
    }

    /// Pane edits call this with `true`; load/save reset it through their own
    /// paths.
    pub fn set_project_change(&mut self, changed: bool) {
        self.changed = changed;
    }

    /// Display name for the title bar, `None` while untitled.
    pub fn file_stem(&self) -> Option<String> {
        self.path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
    }

    /// Resolve `rel` against the project's directory.
    pub fn absolute_path(&self, rel: &Path) -> PathBuf {
        if rel.is_absolute() {
            return rel.to_path_buf();
        }
        match self.path.as_ref().and_then(|p| p.parent()) {
            Some(dir) => dir.join(rel),
            None => rel.to_path_buf(),
        }
    }

    /// Strip the project directory prefix from `abs` when possible.
    pub fn relative_path(&self, abs: &Path) -> PathBuf {
        match self.path.as_ref().and_then(|p| p.parent()) {
            Some(dir) => abs.strip_prefix(dir).unwrap_or(abs).to_path_buf(),
            None => abs.to_path_buf(),
        }
    }

    fn to_xml(&self) -> String {
        let mut xml = String::from("<project>\n");
        xml.push_str(&format!(
            "\t<stage value=\"{}\"/>\n",
            self.shader_stage.config_name()
        ));
        xml.push_str(&format!(
            "\t<api value=\"{}\"/>\n",
            self.api_target.config_name()
        ));
        xml.push_str(&format!(
            "\t<language value=\"{}\"/>\n",
            self.language_target.config_name()
        ));
        xml.push_str(&format!(
            "\t<optimization keep_unused=\"{}\" explicit_types=\"{}\" zero_init_workgroup=\"{}\"/>\n",
            self.options.keep_unused, self.options.explicit_types, self.options.zero_init_workgroup
        ));
        xml.push_str(&format!("\t<source>{}</source>\n", xml_escape(&self.source)));
        xml.push_str("</project>\n");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_project_is_loaded_and_clean() {
        let mut p = ProjectFile::default();
        assert!(!p.is_loaded());
        p.new_project(None);
        assert!(p.is_loaded());
        assert!(!p.has_unsaved_changes());
        assert!(p.path.is_none());
    }

    #[test]
    fn save_without_path_fails() {
        let mut p = ProjectFile::default();
        p.new_project(None);
        p.set_project_change(true);
        assert!(!p.save());
        assert!(p.has_unsaved_changes());
    }

    #[test]
    fn save_as_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.glo");

        let mut p = ProjectFile::default();
        p.new_project(None);
        p.shader_stage = ShaderStage::Vertex;
        p.api_target = ApiTarget::OpenGlEs300;
        p.language_target = LanguageTarget::Wgsl;
        p.options.keep_unused = true;
        p.source = "void main() { /* <escaped> & \"quoted\" */ }".to_string();
        p.set_project_change(true);

        assert!(p.save_as(path.clone()));
        assert!(!p.has_unsaved_changes());

        let mut q = ProjectFile::default();
        assert!(q.load_as(path));
        assert_eq!(q.shader_stage, ShaderStage::Vertex);
        assert_eq!(q.api_target, ApiTarget::OpenGlEs300);
        assert_eq!(q.language_target, LanguageTarget::Wgsl);
        assert!(q.options.keep_unused);
        assert_eq!(q.source, p.source);
        assert!(q.is_loaded());
        assert!(!q.has_unsaved_changes());
    }

    #[test]
    fn subsequent_save_reuses_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.glo");

        let mut p = ProjectFile::default();
        p.new_project(None);
        assert!(p.save_as(path.clone()));

        p.source.push_str("// edited\n");
        p.set_project_change(true);
        assert!(p.save());
        assert!(!p.has_unsaved_changes());

        let mut q = ProjectFile::default();
        assert!(q.load_as(path));
        assert!(q.source.contains("// edited"));
    }

    #[test]
    fn malformed_file_fails_without_mutating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.glo");
        std::fs::write(&path, "<project><stage").unwrap();

        let mut p = ProjectFile::default();
        assert!(!p.load_as(path));
        assert!(!p.is_loaded());
    }

    #[test]
    fn unknown_elements_and_missing_fields_keep_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sparse.glo");
        std::fs::write(
            &path,
            "<project><mystery value=\"42\"/><language value=\"wgsl\"/></project>",
        )
        .unwrap();

        let mut p = ProjectFile::default();
        assert!(p.load_as(path));
        assert_eq!(p.language_target, LanguageTarget::Wgsl);
        assert_eq!(p.shader_stage, ShaderStage::default());
        assert_eq!(p.options, OptimizationOptions::default());
    }

    #[test]
    fn path_helpers_resolve_against_the_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.glo");

        let mut p = ProjectFile::default();
        p.new_project(None);
        assert!(p.save_as(path));

        let abs = p.absolute_path(Path::new("shaders/main.frag"));
        assert_eq!(abs, dir.path().join("shaders/main.frag"));
        assert_eq!(p.relative_path(&abs), PathBuf::from("shaders/main.frag"));
    }

    #[test]
    fn clear_resets_to_unloaded() {
        let mut p = ProjectFile::default();
        p.new_project(None);
        p.set_project_change(true);
        p.clear();
        assert!(!p.is_loaded());
        assert!(!p.has_unsaved_changes());
        assert_eq!(p, ProjectFile::default());
    }
}
