// Known-answer decryption
// Keys and ciphertexts produced by OpenSSL for "Hello World!"

use anyhow::Result;
use rsa_aes_core::{
    codec, decode_private_key, decode_public_key, rsa, CryptoError, DigestAlgorithm, KeyFormat,
    KeyKind, KeyMaterial, RsaConfig,
};

const MESSAGE: &str = "Hello World!";

const PKCS8_PRIVATE: &str = concat!(
    "MIICdwIBADANBgkqhkiG9w0BAQEFAASCAmEwggJdAgEAAoGBANAwCoXO90PanZnItvZeA03ETXFa",
    "zdloKVUonjVVx6WQmXE1B3JJ4Hqf7znwfy5F74gsw74gO2nJcLhfhsqGfejfSX3eomSxGIni4EGy",
    "LtbHy3nvjgRv/sAddokVxN63L2R2+WA+zQ53kCwlVcGmp9uvF0VL39ddLD0O4n0YIC+bAgMBAAEC",
    "gYEAs/gzwISwADpmb2Cxubx/wqRmBg3nUX/X60QXsCedVSTxYInlDAmNQrQri7y5VPkkHmYEOMGI",
    "WuTGyrvZvA4TnMLqAeEe7neNIejkEOUJkL6k1g6GrSB+no3oWXarOZNknR4DVYNbBHt6LmGmNxgg",
    "kCbagPds6sVBQPNMNmRi88ECQQDqTUrhXIUc5QyWL7jwhgYagv/G8zVLQ/IFkx/MWH5fvlOPe2iV",
    "VjMwnbWJbV5Cf/QfyOtaoIVlpC9g7ffFxO9RAkEA43elMqTGq336OOXh55Py77fi0pfh9DECJVc+",
    "0NzKVmIpRBq7Fzz22QX1GuW8qQfiUh7XziyOzirlV+7Ikx7tKwJAKczYSxRieyEx+alR6Tc/54Lv",
    "duL04xSgHPZ+ecpf4VznM3Xk1p+mSkoYlQf6BQsm1nTV6DkzE0sTWMubpKDZwQJBALjsCMoeOUEr",
    "3mOpR7k7hxGpXeY1AcXCner7fZ7REFGf5cpvLNBciJWwiS3/vRtxxGVcm7cKdGJZby/IeRlZ2BcC",
    "QDuOdJmhKOC+Qd25ksUQpmx0W5z5jV8PN7I9Gk2g8BGnQ4iefisvLPKlS+/nSDPrVeBWfpfJhJUY",
    "TRIG7DdJeDI=",
);
const PKCS1_PRIVATE: &str = concat!(
    "MIICXQIBAAKBgQDQMAqFzvdD2p2ZyLb2XgNNxE1xWs3ZaClVKJ41VcelkJlxNQdySeB6n+858H8u",
    "Re+ILMO+IDtpyXC4X4bKhn3o30l93qJksRiJ4uBBsi7Wx8t5744Eb/7AHXaJFcTety9kdvlgPs0O",
    "d5AsJVXBpqfbrxdFS9/XXSw9DuJ9GCAvmwIDAQABAoGBALP4M8CEsAA6Zm9gsbm8f8KkZgYN51F/",
    "1+tEF7AnnVUk8WCJ5QwJjUK0K4u8uVT5JB5mBDjBiFrkxsq72bwOE5zC6gHhHu53jSHo5BDlCZC+",
    "pNYOhq0gfp6N6Fl2qzmTZJ0eA1WDWwR7ei5hpjcYIJAm2oD3bOrFQUDzTDZkYvPBAkEA6k1K4VyF",
    "HOUMli+48IYGGoL/xvM1S0PyBZMfzFh+X75Tj3tolVYzMJ21iW1eQn/0H8jrWqCFZaQvYO33xcTv",
    "UQJBAON3pTKkxqt9+jjl4eeT8u+34tKX4fQxAiVXPtDcylZiKUQauxc89tkF9RrlvKkH4lIe184s",
    "js4q5VfuyJMe7SsCQCnM2EsUYnshMfmpUek3P+eC73bi9OMUoBz2fnnKX+Fc5zN15NafpkpKGJUH",
    "+gULJtZ01eg5MxNLE1jLm6Sg2cECQQC47AjKHjlBK95jqUe5O4cRqV3mNQHFwp3q+32e0RBRn+XK",
    "byzQXIiVsIkt/70bccRlXJu3CnRiWW8vyHkZWdgXAkA7jnSZoSjgvkHduZLFEKZsdFuc+Y1fDzey",
    "PRpNoPARp0OInn4rLyzypUvv50gz61XgVn6XyYSVGE0SBuw3SXgy",
);
const SPKI_PUBLIC: &str = concat!(
    "MIGfMA0GCSqGSIb3DQEBAQUAA4GNADCBiQKBgQDQMAqFzvdD2p2ZyLb2XgNNxE1xWs3ZaClVKJ41",
    "VcelkJlxNQdySeB6n+858H8uRe+ILMO+IDtpyXC4X4bKhn3o30l93qJksRiJ4uBBsi7Wx8t5744E",
    "b/7AHXaJFcTety9kdvlgPs0Od5AsJVXBpqfbrxdFS9/XXSw9DuJ9GCAvmwIDAQAB",
);

/// RSAES-PKCS1-v1_5
const PKCS1_CIPHERTEXT: &str = concat!(
    "xL1+ACgPbPPx1CKCm1dGFOYEjdCiLHl5q3ZVgdhp889GG6KrXw2sN7ojZvw5t1znCv60qdmoiKA2",
    "rKO/Rl1Uvpsyz1gspQjBZcNf1pmORNE3b8vgHrf2gnX/d8vMbv0MLv+mw/NaNYJm/wtZdH0pg0QO",
    "hsuyI4QP2KdfFEQf/RQ=",
);

/// RSAES-OAEP, SHA-256 label digest, MGF1 with SHA-1
const OAEP_CIPHERTEXT: &str = concat!(
    "bCNCHbxgc6ovQ8zgMt+Oqkzrpzp5mwYvbaDwuMoKl4N97vSFw/wU50/Vr6C54JCxGzKMDmHJZn3h",
    "8n7waIR4rPLlTpkKifLczImk8tcW0aUmZyxkkrmm1Ky6SKikEsS7eTbQ7wQOEZzRYsW41Xk2Ejvo",
    "NhZ+Mdxt4q8P5bQZ4Pw=",
);

/// Same OAEP parameters with seed 0x00..0x1f
const OAEP_FIXED_SEED_CIPHERTEXT: &str = concat!(
    "K3Rj6BPMCL3LRSyM6AfzFcKy9CwdsdNeqLhnjgtSkUpJwlivpiDmO/gMoDc6o+YzWWqWIjm2370T",
    "p2A3hoRAVDIr2/NjdKgK3exbYj6FRgzlSrXBes8t6BakqyboFHu+piwji5531ZWr8HnWANNhtx0F",
    "qQqtuOImRxO1E1Bsa7E=",
);

fn oaep_sha256_sha1() -> RsaConfig {
    RsaConfig::oaep(DigestAlgorithm::Sha256, DigestAlgorithm::Sha1)
}

#[test]
fn test_decrypt_pkcs1_ciphertext_with_both_key_formats() -> Result<()> {
    for (text, format) in [(PKCS8_PRIVATE, KeyFormat::Pkcs8), (PKCS1_PRIVATE, KeyFormat::Pkcs1)] {
        let material = KeyMaterial::from_text(text, KeyKind::Private, format)?;
        let plaintext =
            rsa::private_decrypt_to_string(PKCS1_CIPHERTEXT, &material, &RsaConfig::pkcs1())?;
        assert_eq!(plaintext, MESSAGE, "{format}");
    }
    Ok(())
}

#[test]
fn test_decrypt_oaep_ciphertexts() -> Result<()> {
    let private_key = decode_private_key(PKCS8_PRIVATE, KeyFormat::Pkcs8)?;
    let config = oaep_sha256_sha1();

    for ciphertext in [OAEP_CIPHERTEXT, OAEP_FIXED_SEED_CIPHERTEXT] {
        let bytes = codec::decode_ciphertext(ciphertext)?;
        assert_eq!(bytes.len(), 128);
        assert_eq!(rsa::decrypt_bytes(&bytes, &private_key, &config)?, MESSAGE.as_bytes());
    }
    Ok(())
}

#[test]
fn test_wrong_padding_is_a_decryption_error() -> Result<()> {
    let material = KeyMaterial::from_text(PKCS1_PRIVATE, KeyKind::Private, KeyFormat::Pkcs1)?;

    let err = rsa::private_decrypt(OAEP_CIPHERTEXT, &material, &RsaConfig::pkcs1()).unwrap_err();
    assert!(matches!(err, CryptoError::Decryption { .. }));

    let sha256_mask = RsaConfig::oaep(DigestAlgorithm::Sha256, DigestAlgorithm::Sha256);
    let err = rsa::private_decrypt(OAEP_CIPHERTEXT, &material, &sha256_mask).unwrap_err();
    assert!(matches!(err, CryptoError::Decryption { .. }));
    Ok(())
}

#[test]
fn test_encrypt_to_imported_public_key() -> Result<()> {
    let public = KeyMaterial::detect(SPKI_PUBLIC, KeyKind::Public)?;
    assert_eq!(public.format(), KeyFormat::Pkcs8);
    assert_eq!(
        public.to_public_key()?,
        decode_public_key(SPKI_PUBLIC, KeyFormat::Pkcs8)?
    );

    let private = KeyMaterial::detect(PKCS1_PRIVATE, KeyKind::Private)?;
    assert_eq!(private.format(), KeyFormat::Pkcs1);

    for config in [RsaConfig::pkcs1(), oaep_sha256_sha1()] {
        let ciphertext = rsa::public_encrypt_str(MESSAGE, &public, &config)?;
        assert_eq!(rsa::private_decrypt_to_string(&ciphertext, &private, &config)?, MESSAGE);
    }
    Ok(())
}
