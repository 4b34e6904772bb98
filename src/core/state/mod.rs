// Active designation persistence

pub mod designation;

pub use designation::DesignationStore;
