//! Reorderable collections — the add/remove/reorder behavior shared by the
//! skills and education lists.

pub mod editor;
pub mod item;

pub use editor::{ChangeCallback, CollectionEditor};
pub use item::{CollectionItem, EducationForm, SkillForm};

/// Editor for the skills list.
pub type SkillsEditor = CollectionEditor<crate::draft::Skill>;

/// Editor for the education list.
pub type EducationEditor = CollectionEditor<crate::draft::EducationEntry>;
