//! The page's visual behaviours, each registering its animations and triggers
//! with the motion engine.

pub mod contact;
pub mod counter;
pub mod cursor;
pub mod debounce;
pub mod entrance;
pub mod nav;
pub mod pointer;
pub mod progress;
pub mod sections;
