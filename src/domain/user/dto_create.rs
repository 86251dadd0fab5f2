#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub name: String,
    pub username: String,
    pub password: String,
    /// Role assignments by id. Empty means "apply the default-role policy",
    /// which the service resolves before the dto reaches the repository.
    pub role_ids: Vec<i64>,
}
