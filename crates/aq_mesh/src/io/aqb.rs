// crates\aq_mesh\src/io/aqb.rs

//! AQB 二进制格式
//!
//! 紧凑的三角网格二进制格式，顶点坐标按 f64 原样存储，不损失精度。
//!
//! # 格式结构
//!
//! ```text
//! +----------------+
//! | Magic (4B)     |  "AQB1"
//! | Version (4B)   |  格式版本号
//! | Flags (4B)     |  标志位，bit 0 = LZ4 压缩
//! | Vertices (4B)  |  顶点数
//! | Faces (4B)     |  面数
//! +----------------+
//! | Payload        |  顶点 (3 x f64) 后接面 (3 x u32)，小端
//! +----------------+
//! ```
//!
//! 压缩时 payload 为 `lz4_flex` 的带长度前缀块。

use std::io::{Read, Write};

use aq_geo::Point3D;

use crate::error::{MeshError, MeshResult};
use crate::trimesh::TriMesh;

/// AQB 文件魔数
pub const AQB_MAGIC: &[u8; 4] = b"AQB1";

/// AQB 当前版本
pub const AQB_VERSION: u32 = 1;

/// payload 经过 LZ4 压缩
pub const FLAG_LZ4: u32 = 1;

const FORMAT: &str = "AQB";

const VERTEX_SIZE: usize = 3 * 8;
const FACE_SIZE: usize = 3 * 4;

/// AQB 文件头
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AqbHeader {
    /// 版本号
    pub version: u32,
    /// 标志位
    pub flags: u32,
    /// 顶点数
    pub n_vertices: u32,
    /// 面数
    pub n_faces: u32,
}

impl AqbHeader {
    /// 头部大小（字节）
    pub const SIZE: usize = 4 + 4 + 4 + 4 + 4; // magic + version + flags + counts

    /// 为网格创建头部
    pub fn for_mesh(mesh: &TriMesh, compressed: bool) -> Self {
        Self {
            version: AQB_VERSION,
            flags: if compressed { FLAG_LZ4 } else { 0 },
            n_vertices: mesh.n_vertices() as u32,
            n_faces: mesh.n_faces() as u32,
        }
    }

    /// payload 是否压缩
    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_LZ4 != 0
    }

    /// 未压缩 payload 的字节数
    pub fn payload_len(&self) -> usize {
        self.n_vertices as usize * VERTEX_SIZE + self.n_faces as usize * FACE_SIZE
    }

    /// 写入头部
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(AQB_MAGIC)?;
        writer.write_all(&self.version.to_le_bytes())?;
        writer.write_all(&self.flags.to_le_bytes())?;
        writer.write_all(&self.n_vertices.to_le_bytes())?;
        writer.write_all(&self.n_faces.to_le_bytes())?;
        Ok(())
    }

    /// 读取头部
    pub fn read<R: Read>(reader: &mut R) -> MeshResult<Self> {
        let mut magic = [0u8; 4];
        read_exact(reader, &mut magic, "文件头不完整")?;
        if &magic != AQB_MAGIC {
            return Err(MeshError::format_error(FORMAT, 0, "Invalid AQB magic"));
        }

        let version = read_u32(reader)?;
        let flags = read_u32(reader)?;
        let n_vertices = read_u32(reader)?;
        let n_faces = read_u32(reader)?;

        if version != AQB_VERSION {
            return Err(MeshError::format_error(
                FORMAT,
                0,
                format!("不支持的版本 {version}"),
            ));
        }
        Ok(Self { version, flags, n_vertices, n_faces })
    }
}

fn read_u32<R: Read>(reader: &mut R) -> MeshResult<u32> {
    let mut buf4 = [0u8; 4];
    read_exact(reader, &mut buf4, "文件头不完整")?;
    Ok(u32::from_le_bytes(buf4))
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> MeshResult<()> {
    reader
        .read_exact(buf)
        .map_err(|e| MeshError::format_error(FORMAT, 0, format!("{what}: {e}")))
}

fn check_payload_len(actual: usize, expected: usize) -> MeshResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(MeshError::format_error(
            FORMAT,
            0,
            format!("数据长度 {actual} 与文件头不符，应为 {expected}"),
        ))
    }
}

/// LZ4 块的最大解压比
const LZ4_MAX_RATIO: usize = 255;

/// 解压带长度前缀的 LZ4 块
///
/// 长度前缀必须等于文件头算出的长度，并且不超过压缩数据可能展开的上限，
/// 通过后才分配输出缓冲。
fn decompress_payload(data: &[u8], expected: usize) -> MeshResult<Vec<u8>> {
    if data.len() < 4 {
        return Err(MeshError::format_error(FORMAT, 0, "压缩数据缺少长度前缀"));
    }
    let (prefix, block) = data.split_at(4);
    let declared = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
    check_payload_len(declared, expected)?;
    if expected > block.len().saturating_mul(LZ4_MAX_RATIO) {
        return Err(MeshError::Compression {
            message: format!("{} 字节的压缩数据无法展开为 {expected} 字节", block.len()),
        });
    }

    let mut payload = vec![0u8; expected];
    let written = lz4_flex::block::decompress_into(block, &mut payload).map_err(|e| {
        MeshError::Compression {
            message: e.to_string(),
        }
    })?;
    check_payload_len(written, expected)?;
    Ok(payload)
}

/// 编码为 AQB 字节
pub fn write_aqb(mesh: &TriMesh, compress: bool) -> Vec<u8> {
    let header = AqbHeader::for_mesh(mesh, compress);

    let mut payload = Vec::with_capacity(header.payload_len());
    for p in mesh.vertices() {
        for c in p.to_array() {
            payload.extend_from_slice(&c.to_le_bytes());
        }
    }
    for face in mesh.faces() {
        for v in face {
            payload.extend_from_slice(&v.to_le_bytes());
        }
    }
    let payload = if compress {
        lz4_flex::compress_prepend_size(&payload)
    } else {
        payload
    };

    let mut out = Vec::with_capacity(AqbHeader::SIZE + payload.len());
    // 写入 Vec 不会失败
    let _ = header.write(&mut out);
    out.extend_from_slice(&payload);
    out
}

/// 解码 AQB 字节
pub fn read_aqb(bytes: &[u8]) -> MeshResult<TriMesh> {
    let mut reader = bytes;
    let header = AqbHeader::read(&mut reader)?;
    if header.n_vertices == 0 || header.n_faces == 0 {
        return Err(MeshError::EmptyMesh);
    }

    let expected = header.payload_len();
    let payload = if header.is_compressed() {
        decompress_payload(reader, expected)?
    } else {
        check_payload_len(reader.len(), expected)?;
        reader.to_vec()
    };

    let (vertex_bytes, face_bytes) =
        payload.split_at(header.n_vertices as usize * VERTEX_SIZE);

    let vertices: Vec<Point3D> = vertex_bytes
        .chunks_exact(VERTEX_SIZE)
        .map(|chunk| {
            let mut c = [0.0f64; 3];
            for (slot, bytes) in c.iter_mut().zip(chunk.chunks_exact(8)) {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(bytes);
                *slot = f64::from_le_bytes(buf);
            }
            Point3D::from(c)
        })
        .collect();
    if let Some(i) = vertices.iter().position(|p| !p.is_finite()) {
        return Err(MeshError::format_error(FORMAT, 0, format!("顶点 {i} 不是有限值")));
    }

    let faces: Vec<[u32; 3]> = face_bytes
        .chunks_exact(FACE_SIZE)
        .map(|chunk| {
            let mut f = [0u32; 3];
            for (slot, bytes) in f.iter_mut().zip(chunk.chunks_exact(4)) {
                let mut buf = [0u8; 4];
                buf.copy_from_slice(bytes);
                *slot = u32::from_le_bytes(buf);
            }
            f
        })
        .collect();

    TriMesh::from_parts(vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::BoxMeshGenerator;

    fn sample() -> TriMesh {
        BoxMeshGenerator::new(Point3D::new(-0.1, 0.2, 0.3), Point3D::new(1.7, 2.9, 3.3), 4).build()
    }

    #[test]
    fn test_header_layout() {
        let bytes = write_aqb(&sample(), false);
        assert_eq!(&bytes[..4], AQB_MAGIC);
        let header = AqbHeader::read(&mut &bytes[..]).unwrap();
        assert!(!header.is_compressed());
        assert_eq!(header.n_vertices, 6 * 16 + 2);
        assert_eq!(bytes.len(), AqbHeader::SIZE + header.payload_len());
    }

    #[test]
    fn test_compressed_is_lossless() {
        let mesh = sample();
        let bytes = write_aqb(&mesh, true);
        let header = AqbHeader::read(&mut &bytes[..]).unwrap();
        assert!(header.is_compressed());
        assert_eq!(read_aqb(&bytes).unwrap(), mesh);
        assert_eq!(read_aqb(&write_aqb(&mesh, false)).unwrap(), mesh);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = write_aqb(&sample(), false);
        bytes[3] = b'9';
        assert!(matches!(read_aqb(&bytes), Err(MeshError::MeshFormatError { .. })));
    }

    #[test]
    fn test_rejects_truncated_payload() {
        let bytes = write_aqb(&sample(), false);
        assert!(read_aqb(&bytes[..bytes.len() - 5]).is_err());
        assert!(read_aqb(&bytes[..10]).is_err());
    }

    #[test]
    fn test_rejects_corrupt_compressed_payload() {
        let mut bytes = write_aqb(&sample(), true);
        let n = bytes.len();
        bytes.truncate(n - n / 3);
        assert!(read_aqb(&bytes).is_err());
    }

    #[test]
    fn test_rejects_forged_size_prefix() {
        let mut bytes = write_aqb(&sample(), true);
        let at = AqbHeader::SIZE;
        bytes[at..at + 4].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(read_aqb(&bytes), Err(MeshError::MeshFormatError { .. })));
    }

    #[test]
    fn test_rejects_header_counts_beyond_payload() {
        // 文件头声称十万个顶点，压缩数据只有 8 字节
        let header = AqbHeader {
            version: AQB_VERSION,
            flags: FLAG_LZ4,
            n_vertices: 100_000,
            n_faces: 1,
        };
        let mut bytes = Vec::new();
        header.write(&mut bytes).unwrap();
        bytes.extend_from_slice(&(header.payload_len() as u32).to_le_bytes());
        bytes.extend_from_slice(&[0u8; 8]);
        assert!(matches!(read_aqb(&bytes), Err(MeshError::Compression { .. })));
    }
}
