//! Keyboard and pointer shortcut registry and documentation.

use tacmap_core::Modifiers;
use tacmap_core::input::is_undo_shortcut;

/// A shortcut definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub key: &'static str,
    /// Requires Ctrl, or Cmd on macOS.
    pub command: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, command: bool, description: &'static str) -> Self {
        Self {
            key,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl/Cmd+Z").
    pub fn format(&self) -> String {
        if self.command {
            format!("Ctrl/Cmd+{}", self.key)
        } else {
            self.key.to_string()
        }
    }
}

/// Registry of all shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, "Undo"),
            Shortcut::new("Escape", false, "Cancel current stroke or drag"),
            Shortcut::new("Wheel", false, "Zoom around the pointer"),
            Shortcut::new("Middle+Drag", false, "Pan with any tool"),
            Shortcut::new("Drag", false, "Pan (select tool, on the background)"),
            Shortcut::new("Drag element", false, "Move it (select tool)"),
        ]
    }

    /// Description of the registered key shortcut matching the event, if any.
    pub fn lookup(key: &str, modifiers: Modifiers) -> Option<&'static str> {
        if is_undo_shortcut(key, modifiers) {
            return Some("Undo");
        }
        Self::all()
            .into_iter()
            .find(|s| !s.command && s.key == key)
            .map(|s| s.description)
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(Shortcut::new("Z", true, "Undo").format(), "Ctrl/Cmd+Z");
        assert_eq!(Shortcut::new("Escape", false, "Cancel").format(), "Escape");
    }

    #[test]
    fn test_lookup() {
        assert_eq!(ShortcutRegistry::lookup("z", Modifiers::meta()), Some("Undo"));
        assert_eq!(ShortcutRegistry::lookup("z", Modifiers::NONE), None);
        assert_eq!(
            ShortcutRegistry::lookup("Escape", Modifiers::NONE),
            Some("Cancel current stroke or drag")
        );
    }
}
