//! 配置校验模块
//!
//! 校验规则：
//! - 载荷几何合法 (side >= 1, bytes_per_pixel ∈ {1, 2})
//! - 流路径非空
//! - sink 名称唯一且非空
//! - 文件类 sink 必须带 path 参数

use std::collections::HashSet;

use contracts::{CoreError, RunBlueprint, SinkType};
use validator::Validate;

/// 校验 RunBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &RunBlueprint) -> Result<(), CoreError> {
    validate_derived_rules(blueprint)?;
    validate_stream_paths(blueprint)?;
    validate_sinks(blueprint)?;
    Ok(())
}

/// 结构化字段约束 (validator derive)
fn validate_derived_rules(blueprint: &RunBlueprint) -> Result<(), CoreError> {
    blueprint.validate().map_err(|errors| {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(ToString::to_string)
            .unwrap_or_else(|| "payload".to_string());
        CoreError::config_validation(field, errors.to_string())
    })
}

/// 校验流路径非空
fn validate_stream_paths(blueprint: &RunBlueprint) -> Result<(), CoreError> {
    for (label, stream) in [("a", &blueprint.streams.a), ("b", &blueprint.streams.b)] {
        if stream.path.as_os_str().is_empty() {
            return Err(CoreError::config_validation(
                format!("streams.{label}.path"),
                "stream path cannot be empty",
            ));
        }
    }
    Ok(())
}

/// 校验 sink 配置
fn validate_sinks(blueprint: &RunBlueprint) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for (idx, sink) in blueprint.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(CoreError::config_validation(
                format!("sinks[{idx}].name"),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(&sink.name) {
            return Err(CoreError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
        if matches!(sink.sink_type, SinkType::Csv | SinkType::Json)
            && !sink.params.contains_key("path")
        {
            return Err(CoreError::config_validation(
                format!("sinks[{}].params.path", sink.name),
                "file sinks require a 'path' parameter",
            ));
        }
    }
    Ok(())
}
