//! Source text for component files, keyed by template id.

mod engine;
mod project;

use include_dir::{Dir, include_dir};

pub use engine::{
    TemplateSource, Variables, copy_embedded_dir, copy_template, copy_template_dir, interpolate,
};
pub use project::{ProjectFile, app_entry, library_files, project_config_files};

/// Expo Router + Convex starter copied by `bna convex`.
pub static CONVEX_STARTER: Dir<'static> =
    include_dir!("$CARGO_MANIFEST_DIR/templates/start-convex");

/// Canned component sources, embedded at build time.
const COMPONENTS: [(&str, &str); 10] = [
    (
        "button.template.tsx",
        include_str!("../../templates/components/button.template.tsx"),
    ),
    (
        "input.template.tsx",
        include_str!("../../templates/components/input.template.tsx"),
    ),
    (
        "card.template.tsx",
        include_str!("../../templates/components/card.template.tsx"),
    ),
    (
        "modal.template.tsx",
        include_str!("../../templates/components/modal.template.tsx"),
    ),
    (
        "avatar.template.tsx",
        include_str!("../../templates/components/avatar.template.tsx"),
    ),
    (
        "badge.template.tsx",
        include_str!("../../templates/components/badge.template.tsx"),
    ),
    (
        "switch.template.tsx",
        include_str!("../../templates/components/switch.template.tsx"),
    ),
    (
        "spinner.template.tsx",
        include_str!("../../templates/components/spinner.template.tsx"),
    ),
    (
        "toast.template.tsx",
        include_str!("../../templates/components/toast.template.tsx"),
    ),
    (
        "checkbox.template.tsx",
        include_str!("../../templates/components/checkbox.template.tsx"),
    ),
];

/// Whether `template_id` has a canned source.
pub fn is_known(template_id: &str) -> bool {
    COMPONENTS.iter().any(|(id, _)| *id == template_id)
}

/// Produce file content for `template_id`. Unknown ids yield a minimal
/// component named `component_name`.
pub fn render(template_id: &str, component_name: &str) -> String {
    COMPONENTS
        .iter()
        .find(|(id, _)| *id == template_id)
        .map(|(_, source)| source.to_string())
        .unwrap_or_else(|| component_stub(component_name))
}

fn component_stub(component_name: &str) -> String {
    format!(
        r#"import React from 'react';
import {{ View, StyleSheet }} from 'react-native';
import {{ useTheme }} from '../../hooks/useTheme';

interface {name}Props {{
  children?: React.ReactNode;
}}

export function {name}({{ children }}: {name}Props) {{
  const {{ theme }} = useTheme();

  return (
    <View style={{styles.container}}>
      {{children}}
    </View>
  );
}}

const styles = StyleSheet.create({{
  container: {{
    // Add your styles here
  }},
}});
"#,
        name = component_name
    )
}
