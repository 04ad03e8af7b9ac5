//! Application config (`config.xml`): one XML fragment per owning component
//! (theme, layout), merged under a single root. Reading is tolerant: unknown
//! elements are skipped and missing ones keep their defaults, so config files
//! from older or newer builds never break startup.
//!
//! Location:
//!   Linux:    ~/.config/GlslOptimizer/config.xml
//!   Windows:  %APPDATA%\GlslOptimizer\config.xml
//!   macOS:    ~/Library/Application Support/GlslOptimizer/config.xml

use std::path::PathBuf;

use crate::layout::PaneSet;
use crate::theme::ThemeMode;
use crate::{log_err, log_warn};

/// App config directory, created on demand.
pub fn config_dir() -> Option<PathBuf> {
    let dir = dirs::config_dir()?.join("GlslOptimizer");
    let _ = std::fs::create_dir_all(&dir);
    Some(dir)
}

pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.xml"))
}

/// The persisted dock arrangement lives next to config.xml. Its absence marks
/// a first run.
pub fn layout_file_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("layout.json"))
}

/// Minimal XML text/attribute escaping for the handwritten writers.
pub(crate) fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Settings that persist across sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub theme_mode: ThemeMode,
    /// Pane-visibility bitmask owned by the layout manager.
    pub panes: PaneSet,
}

impl AppConfig {
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<config>\n");
        xml.push_str(&format!(
            "\t<theme mode=\"{}\"/>\n",
            self.theme_mode.config_name()
        ));
        xml.push_str("\t<layout>\n");
        xml.push_str(&format!("\t\t<panes value=\"{}\"/>\n", self.panes.bits()));
        xml.push_str("\t</layout>\n");
        xml.push_str("</config>\n");
        xml
    }

    /// Parse a config document. Anything unrecognized or malformed at the
    /// field level keeps the default; only a document that is not XML at all
    /// falls back entirely.
    pub fn from_xml(text: &str) -> Self {
        let mut cfg = Self::default();
        let doc = match roxmltree::Document::parse(text) {
            Ok(d) => d,
            Err(e) => {
                log_warn!("ignoring unreadable config: {}", e);
                return cfg;
            }
        };

        for node in doc.root_element().children().filter(|n| n.is_element()) {
            match node.tag_name().name() {
                "theme" => {
                    if let Some(mode) = node.attribute("mode") {
                        cfg.theme_mode = ThemeMode::from_config_name(mode);
                    }
                }
                "layout" => {
                    for child in node.children().filter(|n| n.is_element()) {
                        if child.tag_name().name() == "panes" {
                            if let Some(bits) =
                                child.attribute("value").and_then(|v| v.parse::<u32>().ok())
                            {
                                cfg.panes = PaneSet::from_bits(bits);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        cfg
    }

    /// Missing file is the first-run case, not an error.
    pub fn load() -> Self {
        let Some(path) = config_file_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => Self::from_xml(&text),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) {
        let Some(path) = config_file_path() else {
            return;
        };
        if let Err(e) = std::fs::write(&path, self.to_xml()) {
            log_err!("failed to write {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Pane;

    #[test]
    fn xml_round_trip() {
        let mut cfg = AppConfig {
            theme_mode: ThemeMode::Light,
            panes: PaneSet::all(),
        };
        cfg.panes.toggle(Pane::Target);

        let parsed = AppConfig::from_xml(&cfg.to_xml());
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn pane_bitmask_round_trips_for_any_toggle_sequence() {
        let sequences: &[&[Pane]] = &[
            &[],
            &[Pane::Optimizer],
            &[Pane::Source, Pane::Target],
            &[Pane::Optimizer, Pane::Optimizer, Pane::Target],
            &[Pane::Optimizer, Pane::Source, Pane::Target],
        ];
        for seq in sequences {
            let mut cfg = AppConfig::default();
            for pane in *seq {
                cfg.panes.toggle(*pane);
            }
            assert_eq!(AppConfig::from_xml(&cfg.to_xml()).panes, cfg.panes);
        }
    }

    #[test]
    fn unknown_elements_and_attributes_are_ignored() {
        let cfg = AppConfig::from_xml(
            "<config>\
               <gizmo level=\"9\"/>\
               <theme mode=\"light\" accent=\"teal\"/>\
               <layout><panes value=\"6\" extra=\"x\"/><widgets value=\"2\"/></layout>\
             </config>",
        );
        assert_eq!(cfg.theme_mode, ThemeMode::Light);
        assert_eq!(cfg.panes.bits(), 6);
    }

    #[test]
    fn missing_elements_keep_defaults() {
        let cfg = AppConfig::from_xml("<config/>");
        assert_eq!(cfg, AppConfig::default());
        // Default means all three panes shown.
        assert_eq!(cfg.panes, PaneSet::all());
    }

    #[test]
    fn garbage_input_falls_back_to_defaults() {
        assert_eq!(AppConfig::from_xml("not xml at all"), AppConfig::default());
        assert_eq!(
            AppConfig::from_xml("<config><layout><panes value=\"nope\"/></layout></config>"),
            AppConfig::default()
        );
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            xml_escape("a < b && c > \"d\""),
            "a &lt; b &amp;&amp; c &gt; &quot;d&quot;"
        );
    }
}
