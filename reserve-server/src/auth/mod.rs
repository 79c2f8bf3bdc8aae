//! 认证模块
//!
//! 身份由外部认证服务签发 (JWT)；本服务只做验证和解析，
//! 将令牌解析为 [`CurrentUser`] `{id, name, role}`。

mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Staff,
    Customer,
}

impl Role {
    /// Staff-level access (staff-wide channel, any reservation's channel)
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Staff)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "STAFF" => Ok(Role::Staff),
            "CUSTOMER" | "USER" => Ok(Role::Customer),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// 当前请求的认证用户 (注入 request extensions)
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub role: Role,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse()
            .map_err(|_| format!("Invalid subject: {}", claims.sub))?;
        let role = claims.role.parse()?;
        Ok(Self {
            id,
            name: claims.name,
            role,
        })
    }
}
