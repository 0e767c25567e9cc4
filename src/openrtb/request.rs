use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use once_cell::sync::OnceCell;
use simd_json::OwnedValue;

/// OpenRTB BidRequest 结构体。
/// 适配器只关心 imp 与 device，其余对象字段保持为 OwnedValue 原样透传，
/// device 提供 lazy 缓存字段和 getter 方法。
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct BidRequest {
    pub id: String,

    /// 广告展示请求列表（imp），需要逐个改写，因此直接解析
    #[serde(default)]
    pub imp: Vec<Imp>,

    /// 网站信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<Box<OwnedValue>>,

    /// 应用信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<Box<OwnedValue>>,

    /// 设备信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Box<OwnedValue>>,
    #[serde(skip)]
    pub device_detail: OnceCell<DeviceDetail>,

    /// 用户信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Box<OwnedValue>>,

    /// 请求来源信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Box<OwnedValue>>,

    /// 隐私法规信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regs: Option<Box<OwnedValue>>,

    /// 请求级扩展，不允许透传给 DSP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Box<OwnedValue>>,

    // 其它简单字段
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmax: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wseat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bseat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allimps: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cur: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wlang: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcat: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badv: Option<Vec<String>>,

    /// 未建模的字段（bapp、acat、cattax 等）原样透传
    #[serde(flatten, default)]
    pub extra: BTreeMap<String, OwnedValue>,
}

/// Imp 表示单个广告展示机会
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Imp {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<Box<OwnedValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Box<OwnedValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<Box<OwnedValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native: Option<Box<OwnedValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmp: Option<Box<OwnedValue>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidfloor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidfloorcur: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instl: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<i32>,

    /// 各 bidder 的扩展参数，形如 `{"bidder": {...}}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Box<OwnedValue>>,

    /// 未建模的字段（exp、rwdd、displaymanager 等）原样透传
    #[serde(flatten, default)]
    pub extra: BTreeMap<String, OwnedValue>,
}

/// DeviceDetail 表示设备信息解析后的数据结构
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DeviceDetail {
    pub ua: Option<String>,
    pub ip: Option<String>,
    pub ipv6: Option<String>,
}

impl BidRequest {
    /// 获取设备信息；device 无法解析时按不存在处理
    pub fn get_device_detail(&self) -> Option<&DeviceDetail> {
        let raw = self.device.as_ref()?;
        self.device_detail
            .get_or_try_init(|| {
                let value = serde_json::to_value(&**raw)?;
                serde_json::from_value::<DeviceDetail>(value)
            })
            .ok()
    }

    /// 构造只包含一个 imp 的请求副本，不复制其它 imp
    pub fn single_imp_copy(&self, imp: Imp) -> BidRequest {
        BidRequest {
            id: self.id.clone(),
            imp: vec![imp],
            site: self.site.clone(),
            app: self.app.clone(),
            device: self.device.clone(),
            device_detail: self.device_detail.clone(),
            user: self.user.clone(),
            source: self.source.clone(),
            regs: self.regs.clone(),
            ext: self.ext.clone(),
            test: self.test,
            at: self.at,
            tmax: self.tmax,
            wseat: self.wseat.clone(),
            bseat: self.bseat.clone(),
            allimps: self.allimps,
            cur: self.cur.clone(),
            wlang: self.wlang.clone(),
            bcat: self.bcat.clone(),
            badv: self.badv.clone(),
            extra: self.extra.clone(),
        }
    }
}
