//! 客户端 IP 提取
//!
//! 默认使用 TCP 连接地址；只有连接来自 `server.trusted_proxies` 时才采信
//! X-Forwarded-For / X-Real-IP，避免客户端伪造头部绕过按 IP 的限流。

use std::net::{IpAddr, SocketAddr};

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;
use tracing::debug;

use crate::config::get_config;

/// 检查 IP 是否在可信代理列表中
pub fn is_trusted_proxy(ip: &str, trusted_proxies: &[String]) -> bool {
    // 先尝试解析为 SocketAddr（支持 ip:port），如果失败再尝试纯 IpAddr
    let ip_addr = if let Ok(socket_addr) = ip.parse::<SocketAddr>() {
        socket_addr.ip()
    } else if let Ok(ip_addr) = ip.parse::<IpAddr>() {
        ip_addr
    } else {
        return false;
    };

    trusted_proxies.iter().any(|proxy| {
        if proxy.contains('/') {
            ip_in_cidr(&ip_addr, proxy)
        } else {
            proxy.parse::<IpAddr>().is_ok_and(|p| p == ip_addr)
        }
    })
}

/// CIDR 检查
pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };

    let Ok(prefix_len): Result<u8, _> = prefix_len.parse() else {
        return false;
    };

    let Ok(network_addr) = network.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network_addr) {
        (IpAddr::V4(ip), IpAddr::V4(net)) => {
            if prefix_len > 32 {
                return false;
            }
            let mask = u32::MAX.checked_shl(32 - prefix_len as u32).unwrap_or(0);
            (u32::from_be_bytes(ip.octets()) & mask) == (u32::from_be_bytes(net.octets()) & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) => {
            if prefix_len > 128 {
                return false;
            }
            let mask = u128::MAX.checked_shl(128 - prefix_len as u32).unwrap_or(0);
            (u128::from_be_bytes(ip.octets()) & mask) == (u128::from_be_bytes(net.octets()) & mask)
        }
        _ => false, // IPv4 vs IPv6 不匹配
    }
}

/// 从 HeaderMap 提取转发的 IP（X-Forwarded-For 第一个，其次 X-Real-IP）
pub fn forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
        })
}

/// 核心判定：peer 在可信代理内才使用转发头
pub fn resolve_client_ip(
    peer: Option<&str>,
    headers: &HeaderMap,
    trusted_proxies: &[String],
) -> Option<String> {
    let peer = peer?;

    if !trusted_proxies.is_empty() && is_trusted_proxy(peer, trusted_proxies) {
        let real_ip = forwarded_ip_from_headers(headers).unwrap_or_else(|| strip_port(peer));
        debug!("Trusted proxy {} -> client {}", peer, real_ip);
        return Some(real_ip);
    }

    Some(strip_port(peer))
}

fn strip_port(addr: &str) -> String {
    addr.parse::<SocketAddr>()
        .map(|s| s.ip().to_string())
        .unwrap_or_else(|_| addr.to_string())
}

/// 从 HttpRequest 提取客户端 IP，拿不到时返回 "unknown"
pub fn extract_client_ip(req: &HttpRequest) -> String {
    let config = get_config();
    let peer = req.peer_addr().map(|a| a.to_string());
    resolve_client_ip(peer.as_deref(), req.headers(), &config.server.trusted_proxies)
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(HeaderName::from_static(k), HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn test_ip_in_cidr_ipv4() {
        let ip: IpAddr = "192.168.1.100".parse().unwrap();
        assert!(ip_in_cidr(&ip, "192.168.1.0/24"));
        assert!(ip_in_cidr(&ip, "192.168.0.0/16"));
        assert!(!ip_in_cidr(&ip, "192.168.2.0/24"));
        assert!(!ip_in_cidr(&ip, "10.0.0.0/8"));
        assert!(!ip_in_cidr(&ip, "10.0.0.0/40"));
    }

    #[test]
    fn test_ip_in_cidr_ipv6() {
        let ip: IpAddr = "2001:db8::1".parse().unwrap();
        assert!(ip_in_cidr(&ip, "2001:db8::/32"));
        assert!(!ip_in_cidr(&ip, "2001:db9::/32"));
    }

    #[test]
    fn test_is_trusted_proxy() {
        let proxies = vec!["127.0.0.1".to_string(), "192.168.1.0/24".to_string()];

        assert!(is_trusted_proxy("127.0.0.1", &proxies));
        assert!(is_trusted_proxy("127.0.0.1:8080", &proxies));
        assert!(is_trusted_proxy("192.168.1.50", &proxies));
        assert!(!is_trusted_proxy("8.8.8.8", &proxies));
        assert!(!is_trusted_proxy("garbage", &proxies));
    }

    #[test]
    fn test_forwarded_header_ignored_without_trusted_proxy() {
        let h = headers(&[("x-forwarded-for", "1.2.3.4")]);
        assert_eq!(
            resolve_client_ip(Some("8.8.8.8:5000"), &h, &[]),
            Some("8.8.8.8".to_string())
        );
    }

    #[test]
    fn test_forwarded_header_used_behind_trusted_proxy() {
        let h = headers(&[("x-forwarded-for", "1.2.3.4, 10.0.0.2")]);
        let proxies = vec!["10.0.0.0/8".to_string()];
        assert_eq!(
            resolve_client_ip(Some("10.0.0.2:5000"), &h, &proxies),
            Some("1.2.3.4".to_string())
        );

        let h = headers(&[("x-real-ip", "5.6.7.8")]);
        assert_eq!(
            resolve_client_ip(Some("10.0.0.2:5000"), &h, &proxies),
            Some("5.6.7.8".to_string())
        );
    }

    #[test]
    fn test_missing_peer() {
        assert_eq!(resolve_client_ip(None, &HeaderMap::new(), &[]), None);
    }
}
