/// Role label attachable to users.
///
/// Roles are reference data seeded by migration; the service never creates
/// or deletes them at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Role {
    pub id: i64,
    pub name: String,
}
