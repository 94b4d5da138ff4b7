use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// 非数字字符匹配（仅保留 ASCII 数字）
pub static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9]").unwrap());

/// 可直接拼入建表语句的列名
pub static SQL_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// 去掉所有非数字字符，无需修改时不分配
pub fn clean_digits(text: &str) -> Cow<'_, str> {
    NON_DIGIT.replace_all(text, "")
}

pub fn is_sql_identifier(name: &str) -> bool {
    SQL_IDENTIFIER.is_match(name)
}
