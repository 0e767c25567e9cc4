// src/adapter/request_builder.rs

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::adapter::ext_parser::imp_ext;
use crate::config::AdapterConfig;
use crate::errors::AdapterError;
use crate::model::ext::ImpExtInfyTvHb;
use crate::model::outbound::{Method, OutboundRequest, RequestContext};
use crate::openrtb::request::{BidRequest, Imp};

pub const OPENRTB_VERSION: &str = "2.5";

/// 每个 imp 生成一个出站请求；解析失败的 imp 记录错误并跳过，不影响其它 imp
pub fn build_requests(
    config: &AdapterConfig,
    request: &BidRequest,
) -> (Vec<OutboundRequest>, Vec<AdapterError>) {
    let mut requests = Vec::with_capacity(request.imp.len());
    let mut errors = Vec::new();

    for imp in &request.imp {
        let infy_ext = match imp_ext(imp) {
            Ok(ext) => ext,
            Err(e) => {
                warn!(request_id = %request.id, imp_id = %imp.id, error = %e, "skipping imp with invalid ext");
                errors.push(e);
                continue;
            }
        };

        match build_request(config, request, imp, &infy_ext) {
            Ok(outbound) => {
                debug!(
                    request_id = %request.id,
                    imp_id = %imp.id,
                    method = ?outbound.method,
                    uri = %outbound.uri,
                    "built outbound request"
                );
                requests.push(outbound);
            }
            Err(e) => {
                warn!(request_id = %request.id, imp_id = %imp.id, error = %e, "failed to build outbound request");
                errors.push(e);
            }
        }
    }

    (requests, errors)
}

fn build_request(
    config: &AdapterConfig,
    request: &BidRequest,
    imp: &Imp,
    infy_ext: &ImpExtInfyTvHb,
) -> Result<OutboundRequest, AdapterError> {
    let mode = infy_ext.endpoint_type;
    let context = RequestContext {
        imp_id: imp.id.clone(),
        mode,
        floor_price: infy_ext.floor,
    };
    let uri = resolve_uri(config, infy_ext);
    let mut headers = device_headers(config, request);

    match mode.http_method() {
        // 标签服务器：GET，无请求体
        Method::Get => Ok(OutboundRequest {
            method: Method::Get,
            uri,
            headers,
            body: None,
            context,
        }),
        Method::Post => {
            let request_copy = imp_request(request, imp, infy_ext);
            let body = serde_json::to_string(&request_copy)
                .map_err(|e| AdapterError::Encode(e.to_string()))?;

            headers.insert("Content-Type".to_string(), "application/json;charset=utf-8".to_string());
            headers.insert("Accept".to_string(), "application/json".to_string());
            headers.insert("x-openrtb-version".to_string(), OPENRTB_VERSION.to_string());

            Ok(OutboundRequest {
                method: Method::Post,
                uri,
                headers,
                body: Some(body),
                context,
            })
        }
    }
}

/// 只含当前 imp 的请求副本，并清掉不应发给 DSP 的字段
fn imp_request(request: &BidRequest, imp: &Imp, infy_ext: &ImpExtInfyTvHb) -> BidRequest {
    let mut imp = imp.clone();
    imp.ext = None;
    if let Some(floor) = infy_ext.floor {
        imp.bidfloor = Some(floor);
    }

    let mut request_copy = request.single_imp_copy(imp);
    request_copy.test = None;
    request_copy.ext = None;
    request_copy
}

fn resolve_uri(config: &AdapterConfig, infy_ext: &ImpExtInfyTvHb) -> String {
    if infy_ext.base.is_empty() && !config.endpoint.is_empty() {
        format!("{}{}", config.endpoint, infy_ext.path)
    } else {
        infy_ext.endpoint_url()
    }
}

fn device_headers(config: &AdapterConfig, request: &BidRequest) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    if let Some(device) = request.get_device_detail() {
        if let Some(ua) = device.ua.as_deref().filter(|ua| !ua.is_empty()) {
            headers.insert("User-Agent".to_string(), ua.to_string());
        }
        if let Some(ip) = config.forwarded_for.pick(device.ip.as_deref(), device.ipv6.as_deref()) {
            headers.insert("X-Forwarded-For".to_string(), ip.to_string());
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForwardedForPolicy;
    use crate::model::ext::EndpointType;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn imp_json(id: &str, bidder: Value) -> Value {
        json!({
            "id": id,
            "video": {"mimes": ["video/mp4"], "w": 1920, "h": 1080},
            "bidfloor": 0.5,
            "ext": {"bidder": bidder}
        })
    }

    fn request(imps: Vec<Value>) -> BidRequest {
        serde_json::from_value(json!({
            "id": "auction-1",
            "imp": imps,
            "device": {"ua": "Roku/DVP-9.10", "ip": "203.0.113.7", "ipv6": "2001:db8::7"},
            "app": {"bundle": "com.example.tv"},
            "test": 1,
            "ext": {"prebid": {"debug": true}}
        }))
        .unwrap()
    }

    fn body_json(outbound: &OutboundRequest) -> Value {
        serde_json::from_str(outbound.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn standard_mode_posts_single_imp_body() {
        let req = request(vec![
            imp_json("1", json!({"base": "https://dsp.example.com", "path": "/ortb"})),
            imp_json("2", json!({"base": "https://dsp.example.com", "path": "/ortb"})),
        ]);
        let (requests, errors) = build_requests(&AdapterConfig::default(), &req);
        assert!(errors.is_empty());
        assert_eq!(requests.len(), 2);

        for (outbound, imp_id) in requests.iter().zip(["1", "2"]) {
            assert_eq!(outbound.method, Method::Post);
            assert_eq!(outbound.uri, "https://dsp.example.com/ortb");
            assert_eq!(outbound.context.imp_id, imp_id);
            assert_eq!(outbound.context.mode, EndpointType::Standard);

            let body = body_json(outbound);
            let imps = body["imp"].as_array().unwrap();
            assert_eq!(imps.len(), 1);
            assert_eq!(imps[0]["id"], imp_id);
            assert!(imps[0].get("ext").is_none());
            assert!(body.get("test").is_none());
            assert!(body.get("ext").is_none());
            assert_eq!(body["app"]["bundle"], "com.example.tv");
            assert_eq!(imps[0]["bidfloor"], 0.5);
        }

        // 原请求保持不变
        assert_eq!(req.test, Some(1));
        assert!(req.ext.is_some());
        assert!(req.imp.iter().all(|imp| imp.ext.is_some()));
    }

    #[test]
    fn unmodeled_fields_pass_through_to_body() {
        let mut imp = imp_json("1", json!({"base": "https://dsp.example.com"}));
        imp["exp"] = json!(300);
        imp["rwdd"] = json!(1);
        imp["displaymanager"] = json!("dm");
        let mut raw = serde_json::to_value(request(vec![imp])).unwrap();
        raw["bapp"] = json!(["com.blocked.app"]);
        raw["acat"] = json!(["IAB1"]);
        raw["cattax"] = json!(2);
        let req: BidRequest = serde_json::from_value(raw).unwrap();

        let (requests, errors) = build_requests(&AdapterConfig::default(), &req);
        assert!(errors.is_empty());
        let body = body_json(&requests[0]);
        assert_eq!(body["bapp"], json!(["com.blocked.app"]));
        assert_eq!(body["acat"], json!(["IAB1"]));
        assert_eq!(body["cattax"], 2);
        assert_eq!(body["imp"][0]["exp"], 300);
        assert_eq!(body["imp"][0]["rwdd"], 1);
        assert_eq!(body["imp"][0]["displaymanager"], "dm");
        // 被清除的字段依旧不出现
        assert!(body.get("test").is_none());
        assert!(body.get("ext").is_none());
        assert!(body["imp"][0].get("ext").is_none());
    }

    #[test]
    fn post_carries_standard_headers() {
        let req = request(vec![imp_json("1", json!({"base": "https://dsp.example.com"}))]);
        let (requests, _) = build_requests(&AdapterConfig::default(), &req);
        let headers = &requests[0].headers;
        assert_eq!(headers["Content-Type"], "application/json;charset=utf-8");
        assert_eq!(headers["Accept"], "application/json");
        assert_eq!(headers["x-openrtb-version"], "2.5");
        assert_eq!(headers["User-Agent"], "Roku/DVP-9.10");
        assert_eq!(headers["X-Forwarded-For"], "2001:db8::7");
    }

    #[test]
    fn forwarded_for_follows_configured_policy() {
        let req = request(vec![imp_json("1", json!({"base": "https://dsp.example.com"}))]);
        let config = AdapterConfig {
            forwarded_for: ForwardedForPolicy::PreferIpv4,
            ..Default::default()
        };
        let (requests, _) = build_requests(&config, &req);
        assert_eq!(requests[0].headers["X-Forwarded-For"], "203.0.113.7");
    }

    #[test]
    fn no_device_means_no_device_headers() {
        let req: BidRequest = serde_json::from_value(json!({
            "id": "a",
            "imp": [imp_json("1", json!({"base": "https://dsp.example.com"}))]
        }))
        .unwrap();
        let (requests, _) = build_requests(&AdapterConfig::default(), &req);
        assert!(!requests[0].headers.contains_key("User-Agent"));
        assert!(!requests[0].headers.contains_key("X-Forwarded-For"));
    }

    #[test]
    fn tag_endpoints_use_get_without_body() {
        for kind in ["VAST_URL", "GAM"] {
            let req = request(vec![imp_json(
                "1",
                json!({"base": "https://tags.example.com/vast?tag=9", "type": kind, "floor_price": 4.0}),
            )]);
            let (requests, errors) = build_requests(&AdapterConfig::default(), &req);
            assert!(errors.is_empty());
            let outbound = &requests[0];
            assert_eq!(outbound.method, Method::Get);
            assert_eq!(outbound.body, None);
            assert_eq!(outbound.uri, "https://tags.example.com/vast?tag=9");
            assert_eq!(outbound.context.floor_price, Some(4.0));
            assert!(!outbound.headers.contains_key("Content-Type"));
            assert_eq!(outbound.headers["User-Agent"], "Roku/DVP-9.10");
        }
    }

    #[test]
    fn floor_override_replaces_imp_floor() {
        let req = request(vec![imp_json(
            "1",
            json!({"base": "https://dsp.example.com", "floor_price": 3.75}),
        )]);
        let (requests, _) = build_requests(&AdapterConfig::default(), &req);
        assert_eq!(body_json(&requests[0])["imp"][0]["bidfloor"], 3.75);
        assert_eq!(req.imp[0].bidfloor, Some(0.5));
    }

    #[test]
    fn invalid_ext_skips_only_that_imp() {
        let mut bad = imp_json("2", json!({}));
        bad["ext"] = json!({"bidder": "not-an-object"});
        let req = request(vec![
            imp_json("1", json!({"base": "https://dsp.example.com"})),
            bad,
            imp_json("3", json!({"base": "https://dsp.example.com", "type": "VAST_URL"})),
        ]);
        let (requests, errors) = build_requests(&AdapterConfig::default(), &req);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].context.imp_id, "1");
        assert_eq!(requests[1].context.imp_id, "3");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], AdapterError::BadInput(_)));
    }

    #[test]
    fn empty_base_falls_back_to_configured_endpoint() {
        let req = request(vec![imp_json("1", json!({"path": "/bid"}))]);
        let config = AdapterConfig {
            endpoint: "https://default.example.com".to_string(),
            ..Default::default()
        };
        let (requests, _) = build_requests(&config, &req);
        assert_eq!(requests[0].uri, "https://default.example.com/bid");
    }

    fn arb_endpoint_type() -> impl Strategy<Value = Option<&'static str>> {
        prop_oneof![
            Just(None),
            Just(Some("VAST_URL")),
            Just(Some("GAM")),
            Just(Some("ORTB")),
        ]
    }

    proptest! {
        #[test]
        fn fan_out_matches_valid_imps(
            imps in proptest::collection::vec((any::<bool>(), arb_endpoint_type()), 0..8)
        ) {
            let imp_values: Vec<Value> = imps
                .iter()
                .enumerate()
                .map(|(i, (valid, kind))| {
                    let mut bidder = json!({"base": "https://dsp.example.com"});
                    if let Some(kind) = kind {
                        bidder["type"] = json!(kind);
                    }
                    let mut imp = imp_json(&i.to_string(), bidder);
                    if !valid {
                        imp["ext"] = json!({"bidder": 42});
                    }
                    imp
                })
                .collect();
            let req = request(imp_values);
            let (requests, errors) = build_requests(&AdapterConfig::default(), &req);

            let failed = imps.iter().filter(|(valid, _)| !valid).count();
            prop_assert_eq!(errors.len(), failed);
            prop_assert_eq!(requests.len(), imps.len() - failed);

            let expected: Vec<(String, Option<&str>)> = imps
                .iter()
                .enumerate()
                .filter(|(_, (valid, _))| *valid)
                .map(|(i, (_, kind))| (i.to_string(), *kind))
                .collect();
            for (outbound, (imp_id, kind)) in requests.iter().zip(expected) {
                prop_assert_eq!(&outbound.context.imp_id, &imp_id);
                match kind {
                    Some("VAST_URL") | Some("GAM") => {
                        prop_assert_eq!(outbound.method, Method::Get);
                        prop_assert!(outbound.body.is_none());
                    }
                    _ => {
                        prop_assert_eq!(outbound.method, Method::Post);
                        prop_assert!(!outbound.body.as_deref().unwrap_or("").is_empty());
                    }
                }
            }
        }
    }
}
