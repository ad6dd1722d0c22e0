use std::collections::BTreeMap;

use super::{ComponentEntry, FileDescriptor};

/// (key, display name, runtime dependencies)
const BUILTIN: [(&str, &str, &[&str]); 10] = [
    ("button", "Button", &[]),
    ("input", "Input", &[]),
    ("card", "Card", &[]),
    (
        "modal",
        "Modal",
        &["react-native-reanimated", "react-native-gesture-handler"],
    ),
    ("avatar", "Avatar", &["expo-image"]),
    ("badge", "Badge", &[]),
    ("switch", "Switch", &[]),
    ("spinner", "Spinner", &["react-native-reanimated"]),
    ("toast", "Toast", &["react-native-reanimated"]),
    ("checkbox", "Checkbox", &["@expo/vector-icons"]),
];

/// Registry used when no registry file can be loaded. Every component is a
/// single `ui/<key>.tsx` file rendered from `<key>.template.tsx`.
pub(super) fn entries() -> BTreeMap<String, ComponentEntry> {
    BUILTIN
        .iter()
        .map(|(key, name, deps)| {
            let entry = ComponentEntry {
                name: name.to_string(),
                files: vec![FileDescriptor {
                    path: format!("ui/{}.tsx", key),
                    template: format!("{}.template.tsx", key),
                }],
                dependencies: deps.iter().map(|d| d.to_string()).collect(),
                dev_dependencies: Vec::new(),
            };
            (key.to_string(), entry)
        })
        .collect()
}
