use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Patient row before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}
