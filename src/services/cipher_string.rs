//! Structural check for encrypted values ("cipher strings").
//!
//! A cipher string is `<type>.<piece>|<piece>[|<piece>]`. The server never
//! decrypts one; it only refuses values whose shape no client could produce.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionType {
    AesCbc256B64 = 0,
    AesCbc128HmacSha256B64 = 1,
    AesCbc256HmacSha256B64 = 2,
    Rsa2048OaepSha256B64 = 3,
    Rsa2048OaepSha1B64 = 4,
    Rsa2048OaepSha256HmacSha256B64 = 5,
    Rsa2048OaepSha1HmacSha256B64 = 6,
}

impl EncryptionType {
    fn from_digit(value: &str) -> Option<Self> {
        match value {
            "0" => Some(Self::AesCbc256B64),
            "1" => Some(Self::AesCbc128HmacSha256B64),
            "2" => Some(Self::AesCbc256HmacSha256B64),
            "3" => Some(Self::Rsa2048OaepSha256B64),
            "4" => Some(Self::Rsa2048OaepSha1B64),
            "5" => Some(Self::Rsa2048OaepSha256HmacSha256B64),
            "6" => Some(Self::Rsa2048OaepSha1HmacSha256B64),
            _ => None,
        }
    }

    /// Number of `|`-separated pieces after the type prefix.
    fn piece_count(self) -> usize {
        match self {
            Self::AesCbc256B64 => 2,
            Self::AesCbc128HmacSha256B64 | Self::AesCbc256HmacSha256B64 => 3,
            Self::Rsa2048OaepSha256B64 | Self::Rsa2048OaepSha1B64 => 1,
            Self::Rsa2048OaepSha256HmacSha256B64 | Self::Rsa2048OaepSha1HmacSha256B64 => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CipherStringError {
    #[error("missing encryption type prefix")]
    MissingType,

    #[error("unknown encryption type {0}")]
    UnknownType(String),

    #[error("expected {expected} pieces, found {found}")]
    WrongPieceCount { expected: usize, found: usize },

    #[error("piece {0} is empty or not base64")]
    BadPiece(usize),
}

/// A validated cipher string, borrowed from its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherString<'a> {
    pub encryption_type: EncryptionType,
    pub pieces: Vec<&'a str>,
}

fn is_b64_piece(piece: &str) -> bool {
    !piece.is_empty()
        && piece
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=' | b'-' | b'_'))
}

pub fn parse(value: &str) -> Result<CipherString<'_>, CipherStringError> {
    let (prefix, body) = value.split_once('.').ok_or(CipherStringError::MissingType)?;
    let encryption_type = EncryptionType::from_digit(prefix)
        .ok_or_else(|| CipherStringError::UnknownType(prefix.to_string()))?;

    let pieces: Vec<&str> = body.split('|').collect();
    let expected = encryption_type.piece_count();
    if pieces.len() != expected {
        return Err(CipherStringError::WrongPieceCount {
            expected,
            found: pieces.len(),
        });
    }

    if let Some(bad) = pieces.iter().position(|p| !is_b64_piece(p)) {
        return Err(CipherStringError::BadPiece(bad));
    }

    Ok(CipherString {
        encryption_type,
        pieces,
    })
}

pub fn is_valid(value: &str) -> bool {
    parse(value).is_ok()
}
