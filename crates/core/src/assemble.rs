//! Composition of the standalone preview document.

use crate::fontface::{FontSourceForm, font_face_css};
use crate::registry::AssetRegistry;
use crate::substitute::SubstitutionEngine;
use quire_types::DocumentSource;

pub const DEFAULT_ENGINE_SCRIPT: &str = "https://unpkg.com/pagedjs/dist/paged.polyfill.js";

/// Page setup and scaffold options for the assembled document.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblerConfig {
    pub page_size: String,
    pub page_margin: String,
    pub document_lang: String,
    pub title: String,
    /// Script tag appended after the user's behavior; `None` omits it.
    pub engine_script: Option<String>,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            page_size: "A4".to_string(),
            page_margin: "2.5cm".to_string(),
            document_lang: "vi".to_string(),
            title: "Print Preview".to_string(),
            engine_script: Some(DEFAULT_ENGINE_SCRIPT.to_string()),
        }
    }
}

const BODY_DEFAULTS: &str = r#"body {
  font-family: 'Times New Roman', serif;
  font-size: 12pt;
  line-height: 1.6;
  background: #2a2a2a;
  padding: 20px;
  margin: 0;
}
"#;

const MEDIA_RULES: &str = r#"@media screen {
  .pagedjs_pages {
    display: flex;
    flex-direction: column;
    align-items: center;
    gap: 20px;
    margin: 0 auto;
    padding: 20px;
  }
  .pagedjs_page {
    background: white !important;
    box-shadow: 0 0 0 1px #666, 0 0 0 3px #999, 0 5px 15px rgba(0,0,0,0.7) !important;
    margin: 0 auto !important;
  }
}

@media print {
  html, body {
    background: white !important;
    padding: 0 !important;
    margin: 0 !important;
  }
  .pagedjs_pages {
    gap: 0 !important;
  }
  .pagedjs_page {
    box-shadow: none !important;
    page-break-after: always !important;
  }
}
"#;

/// Builds the single self-contained document handed to the pagination
/// engine. Inputs are only read.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    config: AssemblerConfig,
}

impl DocumentAssembler {
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    pub fn assemble(&self, source: &DocumentSource, registry: &AssetRegistry) -> String {
        let fonts = font_face_css(registry, FontSourceForm::Inline);
        let body = SubstitutionEngine::new(registry).inline(&source.structure);
        let cfg = &self.config;

        let mut html = String::with_capacity(fonts.len() + body.len() + source.style.len() + 4096);
        html.push_str("<!DOCTYPE html>\n<html lang=\"");
        html.push_str(&cfg.document_lang);
        html.push_str("\">\n<head>\n<meta charset=\"UTF-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
        html.push_str("<title>");
        html.push_str(&cfg.title);
        html.push_str("</title>\n<style>\n");

        html.push_str(&fonts);
        html.push_str("@page {\n  size: ");
        html.push_str(&cfg.page_size);
        html.push_str(";\n  margin: ");
        html.push_str(&cfg.page_margin);
        html.push_str(";\n}\n\n");
        html.push_str(BODY_DEFAULTS);
        html.push('\n');
        html.push_str(&source.style);
        html.push_str("\n\n");
        html.push_str(MEDIA_RULES);
        html.push_str("</style>\n</head>\n<body>\n");

        html.push_str(&body);
        html.push_str("\n<script>");
        html.push_str(&source.behavior);
        html.push_str("</script>\n");
        if let Some(engine) = &cfg.engine_script {
            html.push_str("<script src=\"");
            html.push_str(engine);
            html.push_str("\"></script>\n");
        }
        html.push_str("</body>\n</html>\n");
        html
    }
}
