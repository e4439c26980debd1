// Wire codec. Everything on the socket is a fixed-width little-endian
// i32, written in a fixed order with no padding or length prefixes:
//
//   handshake  host -> peer   size, peer_count, peer_id, width, height
//   start      host -> peer   1
//   per tick   peer -> host   direction (0..=3)
//   per tick   host -> peer   direction[peer_count], dead slots carry 4
//   per tick   host -> peer   item kind (-1 = none), then row, col if any

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{GO_SIGNAL, NO_ITEM};
use crate::arena::{Cell, Coord};

pub async fn write_int<W: AsyncWrite + Unpin>(w: &mut W, v: i32) -> Result<()> {
    w.write_i32_le(v).await.context("write int")?;
    Ok(())
}

pub async fn read_int<R: AsyncRead + Unpin>(r: &mut R) -> Result<i32> {
    r.read_i32_le().await.context("read int")
}

/// The once-per-connection game parameters the host sends ahead of play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hello {
    pub snake_size: i32,
    pub peer_count: i32,
    pub peer_id: i32,
    pub width: i32,
    pub height: i32,
}

impl Hello {
    pub async fn write<W: AsyncWrite + Unpin>(&self, w: &mut W) -> Result<()> {
        write_int(w, self.snake_size).await?;
        write_int(w, self.peer_count).await?;
        write_int(w, self.peer_id).await?;
        write_int(w, self.width).await?;
        write_int(w, self.height).await?;
        Ok(())
    }

    pub async fn read<R: AsyncRead + Unpin>(r: &mut R) -> Result<Hello> {
        let hello = Hello {
            snake_size: read_int(r).await?,
            peer_count: read_int(r).await?,
            peer_id: read_int(r).await?,
            width: read_int(r).await?,
            height: read_int(r).await?,
        };
        if hello.peer_count <= 0 || hello.width <= 0 || hello.height <= 0 {
            bail!("nonsense handshake from host: {hello:?}");
        }
        Ok(hello)
    }
}

pub async fn write_go<W: AsyncWrite + Unpin>(w: &mut W) -> Result<()> {
    write_int(w, GO_SIGNAL).await
}

/// Blocks until the host says go. Anything but the go signal is fatal.
pub async fn read_go<R: AsyncRead + Unpin>(r: &mut R) -> Result<()> {
    let signal = read_int(r).await?;
    if signal != GO_SIGNAL {
        bail!("wrong start signal from host: {signal}");
    }
    Ok(())
}

/// The host's authoritative per-tick vector, one encoded slot per agent.
pub async fn write_dir_vector<W: AsyncWrite + Unpin>(w: &mut W, dirs: &[i32]) -> Result<()> {
    for &d in dirs {
        write_int(w, d).await?;
    }
    Ok(())
}

pub async fn read_dir_vector<R: AsyncRead + Unpin>(r: &mut R, count: usize) -> Result<Vec<i32>> {
    let mut dirs = Vec::with_capacity(count);
    for _ in 0..count {
        dirs.push(read_int(r).await?);
    }
    Ok(dirs)
}

/// Per-tick item record. `None` still writes its sentinel so peers can
/// frame the stream without lookahead.
pub async fn write_item<W: AsyncWrite + Unpin>(
    w: &mut W,
    item: Option<(Cell, Coord)>,
) -> Result<()> {
    match item {
        Some((cell, at)) => {
            write_int(w, cell.code()).await?;
            write_int(w, at.row).await?;
            write_int(w, at.col).await?;
        }
        None => write_int(w, NO_ITEM).await?,
    }
    Ok(())
}

pub async fn read_item<R: AsyncRead + Unpin>(r: &mut R) -> Result<Option<(Cell, Coord)>> {
    let code = read_int(r).await?;
    if code == NO_ITEM {
        return Ok(None);
    }
    let Some(cell) = Cell::from_code(code) else {
        bail!("unknown item kind {code} from host");
    };
    let row = read_int(r).await?;
    let col = read_int(r).await?;
    Ok(Some((cell, Coord::new(row, col))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::DEAD_SENTINEL;

    #[tokio::test]
    async fn hello_round_trips() {
        let (mut a, mut b) = tokio::io::duplex(256);
        let hello = Hello {
            snake_size: 1,
            peer_count: 3,
            peer_id: 2,
            width: 60,
            height: 25,
        };
        hello.write(&mut a).await.unwrap();
        assert_eq!(Hello::read(&mut b).await.unwrap(), hello);
    }

    #[tokio::test]
    async fn bad_hello_is_rejected() {
        let (mut a, mut b) = tokio::io::duplex(256);
        for v in [1, 0, 2, 60, 25] {
            write_int(&mut a, v).await.unwrap(); // peer_count 0
        }
        assert!(Hello::read(&mut b).await.is_err());
    }

    #[tokio::test]
    async fn go_signal_is_checked() {
        let (mut a, mut b) = tokio::io::duplex(64);
        write_go(&mut a).await.unwrap();
        read_go(&mut b).await.unwrap();
        write_int(&mut a, 7).await.unwrap();
        assert!(read_go(&mut b).await.is_err());
    }

    #[tokio::test]
    async fn dir_vector_keeps_order_and_sentinels() {
        let (mut a, mut b) = tokio::io::duplex(256);
        let dirs = vec![0, DEAD_SENTINEL, 2];
        write_dir_vector(&mut a, &dirs).await.unwrap();
        assert_eq!(read_dir_vector(&mut b, 3).await.unwrap(), dirs);
    }

    #[tokio::test]
    async fn item_records_round_trip() {
        let (mut a, mut b) = tokio::io::duplex(256);
        write_item(&mut a, Some((Cell::Food, Coord::new(4, 9)))).await.unwrap();
        write_item(&mut a, None).await.unwrap();
        assert_eq!(
            read_item(&mut b).await.unwrap(),
            Some((Cell::Food, Coord::new(4, 9)))
        );
        assert_eq!(read_item(&mut b).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_item_kind_is_an_error() {
        let (mut a, mut b) = tokio::io::duplex(64);
        write_int(&mut a, 42).await.unwrap();
        assert!(read_item(&mut b).await.is_err());
    }
}
