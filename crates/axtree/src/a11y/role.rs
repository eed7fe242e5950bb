/*!
Role vocabulary.

Roles stay the OS-supplied tag strings (`AXButton`, `AXRow`, ...); this
module owns the allow-lists that drive traversal and filtering decisions.
Two container lists exist on purpose: the builder expands only the tight
structural set, while the interactive filter retains the wider one.
*/

/// Roles that are actionable in themselves.
pub const INTERACTIVE_ROLES: &[&str] = &[
  "AXButton",
  "AXCheckBox",
  "AXComboBox",
  "AXDisclosureTriangle",
  "AXIncrementor",
  "AXLink",
  "AXMenuBarItem",
  "AXMenuButton",
  "AXMenuItem",
  "AXPopUpButton",
  "AXRadioButton",
  "AXSearchField",
  "AXSlider",
  "AXSwitch",
  "AXTextArea",
  "AXTextField",
];

/// Actions whose presence makes any element actionable.
pub const ACTIVATION_ACTIONS: &[&str] = &["AXPress", "AXConfirm"];

/// Structural containers the builder keeps expanding, capped to a tighter
/// sub-depth than the overall budget.
pub const EXPANDABLE_CONTAINER_ROLES: &[&str] = &[
  "AXWindow",
  "AXGroup",
  "AXScrollArea",
  "AXSplitGroup",
  "AXTabGroup",
  "AXToolbar",
];

/// Containers the interactive filter retains even when not interactive.
pub const STRUCTURAL_CONTAINER_ROLES: &[&str] = &[
  "AXWindow",
  "AXGroup",
  "AXScrollArea",
  "AXSplitGroup",
  "AXTabGroup",
  "AXToolbar",
  "AXPopUpButton",
  "AXMenuBar",
  "AXOutline",
];

/// Pure-display roles the builder never expands, to avoid pathological
/// fan-out into large list/table contents.
pub const DISPLAY_ONLY_ROLES: &[&str] = &["AXRow", "AXCell", "AXTable", "AXStaticText"];

/// Display roles the interactive filter drops outright unless interactive.
pub const EXCLUDED_DISPLAY_ROLES: &[&str] =
  &["AXRow", "AXCell", "AXTable", "AXColumn", "AXColumnHeader"];

/// Is the role actionable in itself?
pub fn is_interactive_role(role: &str) -> bool {
  INTERACTIVE_ROLES.contains(&role)
}

/// Should the builder keep expanding this container role?
pub fn is_expandable_container(role: &str) -> bool {
  EXPANDABLE_CONTAINER_ROLES.contains(&role)
}

/// Should the interactive filter retain this container role?
pub fn is_structural_container(role: &str) -> bool {
  STRUCTURAL_CONTAINER_ROLES.contains(&role)
}

/// Is the role a pure-display leaf for traversal purposes?
pub fn is_display_only(role: &str) -> bool {
  DISPLAY_ONLY_ROLES.contains(&role)
}

/// Should the interactive filter drop the role unless it is interactive?
pub fn is_excluded_display(role: &str) -> bool {
  EXCLUDED_DISPLAY_ROLES.contains(&role)
}

/// The `is_interactive` derivation applied once at node construction:
/// an interactive role, or any activation action.
pub fn derives_interactive(role: &str, actions: &[String]) -> bool {
  is_interactive_role(role)
    || actions
      .iter()
      .any(|action| ACTIVATION_ACTIONS.contains(&action.as_str()))
}
