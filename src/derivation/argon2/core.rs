//! Entry points and context handling for Argon2.

use std::fmt;

use zeroize::Zeroize;

use crate::derivation::argon2::block::Block;
use crate::derivation::argon2::boundary::{fill_first_blocks, finalize, initial_hash};
use crate::derivation::argon2::memory::{fill_memory_blocks, Instance};
use crate::derivation::argon2::params::{Argon2ParamError, Params, Variant};

/// Smallest admissible salt length in bytes.
const MIN_SALT_LENGTH: usize = 8;

/// Largest admissible length of any variable-length input.
const MAX_INPUT_LENGTH: usize = u32::MAX as usize;

/// Errors that can occur during an Argon2 computation.
#[derive(Debug, PartialEq, Eq)]
pub enum Argon2Error {
    /// Invalid tuning parameters.
    InvalidParams(Argon2ParamError),
    /// Salt must be at least 8 bytes.
    SaltTooShort,
    /// Salt length must fit in 32 bits.
    SaltTooLong,
    /// Password length must fit in 32 bits.
    PasswordTooLong,
    /// Secret length must fit in 32 bits.
    SecretTooLong,
    /// Associated data length must fit in 32 bits.
    AssociatedDataTooLong,
    /// The working memory (or a worker thread) could not be allocated.
    AllocationFailed,
}

impl fmt::Display for Argon2Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams(err) => write!(f, "invalid parameters: {err}"),
            Self::SaltTooShort => write!(f, "salt shorter than 8 bytes"),
            Self::SaltTooLong => write!(f, "salt length does not fit in 32 bits"),
            Self::PasswordTooLong => write!(f, "password length does not fit in 32 bits"),
            Self::SecretTooLong => write!(f, "secret length does not fit in 32 bits"),
            Self::AssociatedDataTooLong => {
                write!(f, "associated data length does not fit in 32 bits")
            }
            Self::AllocationFailed => write!(f, "working memory could not be allocated"),
        }
    }
}

impl std::error::Error for Argon2Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidParams(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Argon2ParamError> for Argon2Error {
    fn from(err: Argon2ParamError) -> Self {
        Argon2Error::InvalidParams(err)
    }
}

/// The externally supplied inputs of one hash computation.
///
/// The context owns its buffers so the clear flags can actually destroy
/// them: when `clear_password` or `clear_secret` is set, the buffer is
/// zeroized (and emptied) as soon as the pre-hashing digest has absorbed
/// it, on error paths included. `clear_memory` wipes the working memory
/// before it is released.
#[derive(Debug, Default)]
pub struct Context {
    pub password: Vec<u8>,
    pub salt: Vec<u8>,
    pub secret: Vec<u8>,
    pub ad: Vec<u8>,
    pub clear_password: bool,
    pub clear_secret: bool,
    pub clear_memory: bool,
    /// Dump the pre-hashing digest, the memory after every pass, and the
    /// tag, in the reference test-vector layout.
    pub print_internals: bool,
}

impl Context {
    /// Context for the common case: a password and a salt, nothing else.
    pub fn new(password: impl Into<Vec<u8>>, salt: impl Into<Vec<u8>>) -> Self {
        Self {
            password: password.into(),
            salt: salt.into(),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), Argon2Error> {
        if self.salt.len() < MIN_SALT_LENGTH {
            return Err(Argon2Error::SaltTooShort);
        }

        if self.salt.len() > MAX_INPUT_LENGTH {
            return Err(Argon2Error::SaltTooLong);
        }

        if self.password.len() > MAX_INPUT_LENGTH {
            return Err(Argon2Error::PasswordTooLong);
        }

        if self.secret.len() > MAX_INPUT_LENGTH {
            return Err(Argon2Error::SecretTooLong);
        }

        if self.ad.len() > MAX_INPUT_LENGTH {
            return Err(Argon2Error::AssociatedDataTooLong);
        }

        Ok(())
    }

    /// Destroys the sensitive inputs whose clear flag is set.
    fn clear_sensitive(&mut self) {
        if self.clear_password {
            self.password.zeroize();
        }
        if self.clear_secret {
            self.secret.zeroize();
        }
    }
}

/// Computes an Argon2 hash of the context's inputs.
///
/// This is the full entry point: it validates all inputs, allocates the
/// working memory, seeds it from the pre-hashing digest, fills it over
/// `params.time` passes with `params.threads` workers, and folds the last
/// column into the output tag.
///
/// # Returns
///
/// The tag of `params.tag_len` bytes, or the first validation or
/// allocation error. Nothing is produced on failure, and the clear flags
/// are honored on every path.
///
/// # Example
///
/// ```rust, ignore
/// use memhard::derivation::{argon2, Context, Params, Variant};
///
/// let mut context = Context::new(b"my_password".as_slice(), b"random_salt_16b!".as_slice());
/// let tag = argon2(Variant::Argon2id, &mut context, &Params::default()).unwrap();
/// ```
pub fn argon2(
    variant: Variant,
    context: &mut Context,
    params: &Params,
) -> Result<Vec<u8>, Argon2Error> {
    let checks = params
        .validate()
        .map_err(Argon2Error::from)
        .and_then(|()| context.validate());
    if let Err(err) = checks {
        context.clear_sensitive();
        return Err(err);
    }

    let instance = Instance::new(params, variant, context.print_internals);

    let mut memory: Vec<Block> = Vec::new();
    if memory
        .try_reserve_exact(instance.memory_blocks as usize)
        .is_err()
    {
        context.clear_sensitive();
        return Err(Argon2Error::AllocationFailed);
    }
    memory.resize(instance.memory_blocks as usize, Block::ZERO);

    let mut h0 = initial_hash(context, params, variant);
    context.clear_sensitive();

    if context.print_internals {
        print_parameters(context, params, variant, &h0);
    }

    fill_first_blocks(&h0, &instance, &mut memory);
    h0.zeroize();

    if let Err(err) = fill_memory_blocks(&instance, &mut memory) {
        if context.clear_memory {
            for block in memory.iter_mut() {
                block.zeroize();
            }
        }
        return Err(err);
    }

    let tag = finalize(&instance, &mut memory, params.tag_len, context.clear_memory);

    if context.print_internals {
        print_tag(&tag);
    }

    Ok(tag)
}

/// Computes an Argon2d hash of the given password.
///
/// Data-dependent addressing: the strongest trade-off resistance, but the
/// memory access pattern depends on the password. Use for proof-of-work
/// and other settings without timing side channels.
pub fn argon2d(password: &[u8], salt: &[u8], params: &Params) -> Result<Vec<u8>, Argon2Error> {
    argon2(Variant::Argon2d, &mut Context::new(password, salt), params)
}

/// Computes an Argon2i hash of the given password.
///
/// Data-independent addressing: the access pattern reveals nothing about
/// the password.
pub fn argon2i(password: &[u8], salt: &[u8], params: &Params) -> Result<Vec<u8>, Argon2Error> {
    argon2(Variant::Argon2i, &mut Context::new(password, salt), params)
}

/// Computes an Argon2id hash of the given password.
///
/// The recommended default for password storage.
///
/// # Example
///
/// ```rust, ignore
/// use memhard::derivation::{argon2id, Params};
///
/// let hash = argon2id(b"my_password", b"random_salt_16b!", &Params::default()).unwrap();
/// ```
pub fn argon2id(password: &[u8], salt: &[u8], params: &Params) -> Result<Vec<u8>, Argon2Error> {
    argon2(Variant::Argon2id, &mut Context::new(password, salt), params)
}

/// Computes an Argon2ds hash of the given password.
///
/// Argon2d hardened with the S-box multiplication chain. Non-standard;
/// use only where compatibility with it is required.
pub fn argon2ds(password: &[u8], salt: &[u8], params: &Params) -> Result<Vec<u8>, Argon2Error> {
    argon2(Variant::Argon2ds, &mut Context::new(password, salt), params)
}

fn print_parameters(context: &Context, params: &Params, variant: Variant, h0: &[u8]) {
    println!("======================================={variant:?}");
    println!(
        "Memory: {} KiB, Iterations: {}, Parallelism: {} lanes, Tag length: {} bytes",
        params.mem_kib, params.time, params.lanes, params.tag_len
    );
    print_bytes("Salt", &context.salt);
    print_bytes("Pre-hashing digest", h0);
}

fn print_tag(tag: &[u8]) {
    print_bytes("Tag", tag);
}

fn print_bytes(prefix: &str, bytes: &[u8]) {
    print!("{prefix}: ");
    for byte in bytes {
        print!("{byte:02x} ");
    }
    println!();
}
