use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoInfoError {
    InvalidAddress(String),
    NoResolvableAddress(String),
    GeoLookupMiss(String),
    AsnLookupMiss(String),
    DatabaseLoad(String),
    Configuration(String),
    FileOperation(String),
    Serialization(String),
}

impl GeoInfoError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GeoInfoError::InvalidAddress(_) => "E001",
            GeoInfoError::NoResolvableAddress(_) => "E002",
            GeoInfoError::GeoLookupMiss(_) => "E003",
            GeoInfoError::AsnLookupMiss(_) => "E004",
            GeoInfoError::DatabaseLoad(_) => "E005",
            GeoInfoError::Configuration(_) => "E006",
            GeoInfoError::FileOperation(_) => "E007",
            GeoInfoError::Serialization(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GeoInfoError::InvalidAddress(_) => "Invalid Address",
            GeoInfoError::NoResolvableAddress(_) => "No Resolvable Address",
            GeoInfoError::GeoLookupMiss(_) => "GeoIP Record Not Found",
            GeoInfoError::AsnLookupMiss(_) => "ASN Record Not Found",
            GeoInfoError::DatabaseLoad(_) => "Database Load Error",
            GeoInfoError::Configuration(_) => "Configuration Error",
            GeoInfoError::FileOperation(_) => "File Operation Error",
            GeoInfoError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            GeoInfoError::InvalidAddress(msg) => msg,
            GeoInfoError::NoResolvableAddress(msg) => msg,
            GeoInfoError::GeoLookupMiss(msg) => msg,
            GeoInfoError::AsnLookupMiss(msg) => msg,
            GeoInfoError::DatabaseLoad(msg) => msg,
            GeoInfoError::Configuration(msg) => msg,
            GeoInfoError::FileOperation(msg) => msg,
            GeoInfoError::Serialization(msg) => msg,
        }
    }

    /// 软失败：只影响可选的补充字段，不中断请求
    pub fn is_soft(&self) -> bool {
        matches!(self, GeoInfoError::AsnLookupMiss(_))
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GeoInfoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GeoInfoError {}

// 便捷的构造函数
impl GeoInfoError {
    pub fn invalid_address<T: Into<String>>(msg: T) -> Self {
        GeoInfoError::InvalidAddress(msg.into())
    }

    pub fn no_resolvable_address<T: Into<String>>(msg: T) -> Self {
        GeoInfoError::NoResolvableAddress(msg.into())
    }

    pub fn geo_lookup_miss<T: Into<String>>(msg: T) -> Self {
        GeoInfoError::GeoLookupMiss(msg.into())
    }

    pub fn asn_lookup_miss<T: Into<String>>(msg: T) -> Self {
        GeoInfoError::AsnLookupMiss(msg.into())
    }

    pub fn database_load<T: Into<String>>(msg: T) -> Self {
        GeoInfoError::DatabaseLoad(msg.into())
    }

    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        GeoInfoError::Configuration(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        GeoInfoError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        GeoInfoError::Serialization(msg.into())
    }
}

impl From<maxminddb::MaxMindDbError> for GeoInfoError {
    fn from(err: maxminddb::MaxMindDbError) -> Self {
        GeoInfoError::DatabaseLoad(err.to_string())
    }
}

impl From<std::io::Error> for GeoInfoError {
    fn from(err: std::io::Error) -> Self {
        GeoInfoError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GeoInfoError {
    fn from(err: serde_json::Error) -> Self {
        GeoInfoError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeoInfoError>;
