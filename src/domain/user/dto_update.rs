#[derive(Debug, Clone)]
pub struct UpdateUserDto {
    pub name: String,
    pub username: String,
    /// New plaintext password. `None` keeps the stored hash.
    pub password: Option<String>,
    pub role_ids: Vec<i64>,
}
