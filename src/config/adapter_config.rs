use serde::{Serialize, Deserialize};

/// X-Forwarded-For 的取值策略（device 同时带 ip 与 ipv6 时）
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForwardedForPolicy {
    #[default]
    PreferIpv6,
    PreferIpv4,
}

impl ForwardedForPolicy {
    pub fn pick<'a>(&self, ipv4: Option<&'a str>, ipv6: Option<&'a str>) -> Option<&'a str> {
        let ipv4 = ipv4.filter(|ip| !ip.is_empty());
        let ipv6 = ipv6.filter(|ip| !ip.is_empty());
        match self {
            ForwardedForPolicy::PreferIpv6 => ipv6.or(ipv4),
            ForwardedForPolicy::PreferIpv4 => ipv4.or(ipv6),
        }
    }
}

fn default_resolve_macros() -> bool {
    true
}

/// 适配器实例配置
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AdapterConfig {
    /// imp.ext 中 base 为空时使用的默认地址
    #[serde(default)]
    pub endpoint: String,
    /// 是否替换 nurl / adm 中的 ${AUCTION_PRICE}
    #[serde(default = "default_resolve_macros")]
    pub resolve_macros: bool,
    #[serde(default)]
    pub forwarded_for: ForwardedForPolicy,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            resolve_macros: default_resolve_macros(),
            forwarded_for: ForwardedForPolicy::default(),
        }
    }
}
