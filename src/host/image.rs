//! Offline type system and memory host over a byte snapshot
//!
//! Serves type lookups from a small descriptor registry (seeded with the C
//! primitives) and typed dereferences from a captured memory image, decoding
//! values little-endian. Useful for rendering against core dumps or test
//! fixtures without a live process.

use super::{HostError, TargetMemory, TypeDescriptor, TypeKind, TypeSystem};

/// Byte snapshot of target memory plus a type-descriptor registry.
pub struct StaticImage {
    base: u64,
    bytes: Vec<u8>,
    types: Vec<TypeDescriptor>,
}

impl StaticImage {
    /// Image covering `[base, base + bytes.len())`, with the C primitive
    /// types pre-registered.
    pub fn new(base: u64, bytes: Vec<u8>) -> Self {
        Self {
            base,
            bytes,
            types: builtin_types(),
        }
    }

    /// Register an additional type descriptor, replacing any same-named one.
    pub fn register_type(&mut self, desc: TypeDescriptor) {
        self.types.retain(|t| t.name != desc.name);
        self.types.push(desc);
    }

    fn read(&self, address: u64, len: usize) -> Result<&[u8], HostError> {
        let start = address
            .checked_sub(self.base)
            .ok_or_else(|| unreadable(address, "below image base"))?
            as usize;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| unreadable(address, "past end of image"))?;
        Ok(&self.bytes[start..end])
    }
}

fn unreadable(address: u64, reason: &str) -> HostError {
    HostError::Unreadable {
        address,
        reason: reason.to_string(),
    }
}

impl TypeSystem for StaticImage {
    fn lookup(&self, name: &str) -> Result<TypeDescriptor, HostError> {
        let wanted = name.trim();
        self.types
            .iter()
            .find(|t| t.name == wanted)
            .cloned()
            .ok_or_else(|| HostError::TypeNotFound {
                name: wanted.to_string(),
            })
    }
}

impl TargetMemory for StaticImage {
    fn deref_typed(&self, address: u64, ty: &TypeDescriptor) -> Result<String, HostError> {
        let bytes = self.read(address, ty.size)?;
        Ok(decode(bytes, ty))
    }
}

/// Render `bytes` as a value of `ty`, little-endian.
fn decode(bytes: &[u8], ty: &TypeDescriptor) -> String {
    match ty.kind {
        TypeKind::Int { signed } => {
            let mut buf = [0u8; 8];
            buf[..bytes.len().min(8)].copy_from_slice(&bytes[..bytes.len().min(8)]);
            let raw = u64::from_le_bytes(buf);
            if signed {
                // Sign-extend from the type's width
                let shift = 64 - 8 * ty.size.min(8) as u32;
                format!("{}", ((raw << shift) as i64) >> shift)
            } else {
                format!("{raw}")
            }
        }
        TypeKind::Float => match ty.size {
            4 => format!("{}", f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
            8 => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&bytes[..8]);
                format!("{}", f64::from_le_bytes(buf))
            }
            _ => format!("<float[{}]> 0x{}", ty.size, hex::encode(bytes)),
        },
        TypeKind::Bool => format!("{}", bytes[0] != 0),
        TypeKind::Char => {
            let byte = bytes[0];
            if byte.is_ascii_graphic() || byte == b' ' {
                format!("'{}'", byte as char)
            } else {
                format!("'\\x{byte:02x}'")
            }
        }
        TypeKind::Pointer => {
            let mut buf = [0u8; 8];
            buf[..bytes.len().min(8)].copy_from_slice(&bytes[..bytes.len().min(8)]);
            let addr = u64::from_le_bytes(buf);
            if addr == 0 {
                "NULL".to_string()
            } else {
                format!("{addr:#x}")
            }
        }
        TypeKind::Opaque => format!("0x{}", hex::encode(bytes)),
    }
}

fn builtin_types() -> Vec<TypeDescriptor> {
    let int = |name: &str, size, signed| TypeDescriptor::new(name, size, TypeKind::Int { signed });
    vec![
        int("short", 2, true),
        int("unsigned short", 2, false),
        int("int", 4, true),
        int("unsigned int", 4, false),
        int("long", 8, true),
        int("unsigned long", 8, false),
        int("long long", 8, true),
        int("unsigned long long", 8, false),
        TypeDescriptor::new("char", 1, TypeKind::Char),
        TypeDescriptor::new("signed char", 1, TypeKind::Int { signed: true }),
        TypeDescriptor::new("unsigned char", 1, TypeKind::Int { signed: false }),
        TypeDescriptor::new("bool", 1, TypeKind::Bool),
        TypeDescriptor::new("float", 4, TypeKind::Float),
        TypeDescriptor::new("double", 8, TypeKind::Float),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_int_little_endian() {
        let image = StaticImage::new(0x7000, vec![42, 0, 0, 0]);
        let ty = image.lookup("int").unwrap();
        assert_eq!(image.deref_typed(0x7000, &ty).unwrap(), "42");
    }

    #[test]
    fn decodes_negative_int() {
        let image = StaticImage::new(0x7000, (-7i32).to_le_bytes().to_vec());
        let ty = image.lookup("int").unwrap();
        assert_eq!(image.deref_typed(0x7000, &ty).unwrap(), "-7");
    }

    #[test]
    fn decodes_double() {
        let image = StaticImage::new(0x7000, 1.5f64.to_le_bytes().to_vec());
        let ty = image.lookup("double").unwrap();
        assert_eq!(image.deref_typed(0x7000, &ty).unwrap(), "1.5");
    }

    #[test]
    fn unknown_type_is_not_found() {
        let image = StaticImage::new(0, vec![]);
        assert!(matches!(
            image.lookup("my::ns::widget"),
            Err(HostError::TypeNotFound { .. })
        ));
    }

    #[test]
    fn read_outside_image_is_unreadable() {
        let image = StaticImage::new(0x7000, vec![0; 4]);
        let ty = image.lookup("int").unwrap();
        assert!(matches!(
            image.deref_typed(0x6000, &ty),
            Err(HostError::Unreadable { .. })
        ));
        assert!(matches!(
            image.deref_typed(0x7002, &ty),
            Err(HostError::Unreadable { .. })
        ));
    }

    #[test]
    fn registered_opaque_type_dumps_hex() {
        let mut image = StaticImage::new(0, vec![0xde, 0xad, 0xbe, 0xef]);
        image.register_type(TypeDescriptor::new("blob", 4, TypeKind::Opaque));
        let ty = image.lookup("blob").unwrap();
        assert_eq!(image.deref_typed(0, &ty).unwrap(), "0xdeadbeef");
    }
}
