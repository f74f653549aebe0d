use super::UserRole;

#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub password: String,
}
