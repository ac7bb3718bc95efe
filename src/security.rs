//! Security Module
//!
//! 入力ワークブックのサイズ制限を定義するモジュール。
//! 全体をメモリに読み込んでから解析するため、巨大な入力を事前に拒否します。

use crate::error::XlsxToPifError;

/// セキュリティ設定
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 2GB (2_147_483_648 bytes)
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 2_147_483_648, // 2GB
        }
    }
}

impl SecurityConfig {
    /// 入力サイズを検証
    ///
    /// # 戻り値
    ///
    /// * `Err(XlsxToPifError::SecurityViolation)` - 上限を超えている場合
    pub fn check_input_size(&self, bytes: u64) -> Result<(), XlsxToPifError> {
        if bytes > self.max_input_file_size {
            return Err(XlsxToPifError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                bytes, self.max_input_file_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit() {
        assert_eq!(SecurityConfig::default().max_input_file_size, 2_147_483_648);
    }

    #[test]
    fn test_check_input_size() {
        let config = SecurityConfig {
            max_input_file_size: 10,
        };
        assert!(config.check_input_size(0).is_ok());
        assert!(config.check_input_size(10).is_ok());

        match config.check_input_size(11) {
            Err(XlsxToPifError::SecurityViolation(msg)) => {
                assert!(msg.contains("11 bytes"));
                assert!(msg.contains("max: 10 bytes"));
            }
            other => panic!("Expected SecurityViolation, got {:?}", other),
        }
    }
}
