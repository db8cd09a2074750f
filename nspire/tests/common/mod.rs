//! Shared test transports
//!
//! `ScriptedTransport` replays canned device replies and records every
//! write. `FakeCalculator` emulates the file service of a real device on an
//! in-memory filesystem.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use nspire_transport::{Error, Result, Transport};

pub const DISCONNECT: &[u8] = &[0x04];
pub const NEXT_ENTRY: &[u8] = &[0x0E];

/// Writes and read requests seen by a test transport
#[derive(Debug, Clone, Default)]
pub struct WireLog {
    inner: Arc<Mutex<WireLogInner>>,
}

#[derive(Debug, Default)]
struct WireLogInner {
    writes: Vec<Vec<u8>>,
    write_timeouts: Vec<Duration>,
    read_lengths: Vec<usize>,
    read_timeouts: Vec<Duration>,
    released: bool,
}

impl WireLog {
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.inner.lock().unwrap().writes.clone()
    }

    pub fn read_lengths(&self) -> Vec<usize> {
        self.inner.lock().unwrap().read_lengths.clone()
    }

    pub fn write_timeouts(&self) -> Vec<Duration> {
        self.inner.lock().unwrap().write_timeouts.clone()
    }

    pub fn read_timeouts(&self) -> Vec<Duration> {
        self.inner.lock().unwrap().read_timeouts.clone()
    }

    pub fn released(&self) -> bool {
        self.inner.lock().unwrap().released
    }

    /// Upload data frames (chunk marker first)
    pub fn chunk_writes(&self) -> Vec<Vec<u8>> {
        self.writes()
            .into_iter()
            .filter(|w| w.first() == Some(&0x05))
            .collect()
    }

    pub fn count(&self, frame: &[u8]) -> usize {
        self.writes().iter().filter(|w| w.as_slice() == frame).count()
    }

    fn record_write(&self, data: &[u8], timeout: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.writes.push(data.to_vec());
        inner.write_timeouts.push(timeout);
    }

    fn record_read(&self, max_len: usize, timeout: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.read_lengths.push(max_len);
        inner.read_timeouts.push(timeout);
    }

    fn record_release(&self) {
        self.inner.lock().unwrap().released = true;
    }
}

/// Transport that answers reads from a fixed script
///
/// Writes always succeed. Replies come back as scripted, even when longer
/// than the requested length. Once the script runs out, reads time out.
pub struct ScriptedTransport {
    replies: VecDeque<Vec<u8>>,
    log: WireLog,
}

impl ScriptedTransport {
    pub fn new<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        Self {
            replies: replies.into_iter().collect(),
            log: WireLog::default(),
        }
    }

    pub fn log(&self) -> WireLog {
        self.log.clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn write(&mut self, data: &[u8], timeout: Duration) -> Result<usize> {
        self.log.record_write(data, timeout);
        Ok(data.len())
    }

    async fn read(&mut self, max_len: usize, timeout: Duration) -> Result<BytesMut> {
        self.log.record_read(max_len, timeout);
        let reply = self.replies.pop_front().ok_or(Error::ReadTimeout(timeout))?;
        Ok(BytesMut::from(reply.as_slice()))
    }

    async fn release(&mut self) -> Result<()> {
        self.log.record_release();
        Ok(())
    }

    fn is_open(&self) -> bool {
        !self.log.released()
    }

    fn description(&self) -> String {
        "scripted".into()
    }
}

/// Directory entry record as the device sends it
pub fn entry_frame(is_dir: bool, size: u32, modified: u32, name: &str) -> Vec<u8> {
    let mut buf = vec![0x00, u8::from(is_dir), 0x00, 0x00];
    buf.extend_from_slice(&size.to_be_bytes());
    buf.extend_from_slice(&modified.to_be_bytes());
    buf.extend_from_slice(name.as_bytes());
    buf.push(0);
    buf
}

/// Header answering a read request for a file of `size` bytes
pub fn file_header(size: u32) -> Vec<u8> {
    let mut buf = vec![0x03, 0x01];
    buf.extend_from_slice(&[0; 10]);
    buf.extend_from_slice(&size.to_be_bytes());
    buf
}

pub const FAKE_MTIME: u32 = 1_700_000_000;

/// In-memory emulation of the calculator file service
#[derive(Clone, Default)]
pub struct FakeCalculator {
    state: Arc<Mutex<FakeState>>,
    log: WireLog,
}

#[derive(Default)]
struct FakeState {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
    mode: Mode,
    pending: VecDeque<Vec<u8>>,
    disconnects: usize,
    reject_uploads: bool,
    withhold_confirmation: bool,
}

#[derive(Default)]
enum Mode {
    #[default]
    Idle,
    Ready,
    Receiving {
        path: String,
        expected: usize,
        data: Vec<u8>,
    },
    AwaitBegin {
        data: Vec<u8>,
    },
    Sending {
        data: Vec<u8>,
        offset: usize,
    },
    AwaitAck,
    Listing {
        entries: VecDeque<Vec<u8>>,
    },
}

impl FakeCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, data: &[u8]) -> Self {
        self.state.lock().unwrap().files.insert(path.into(), data.to_vec());
        self
    }

    pub fn with_dir(self, path: &str) -> Self {
        self.state.lock().unwrap().dirs.insert(path.into());
        self
    }

    /// Answer every upload init with a refusal
    pub fn rejecting_uploads(self) -> Self {
        self.state.lock().unwrap().reject_uploads = true;
        self
    }

    /// Store uploads but never send the completion marker
    pub fn withholding_confirmation(self) -> Self {
        self.state.lock().unwrap().withhold_confirmation = true;
        self
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    pub fn disconnects(&self) -> usize {
        self.state.lock().unwrap().disconnects
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state.lock().unwrap().mode, Mode::Idle)
    }

    pub fn log(&self) -> WireLog {
        self.log.clone()
    }
}

impl FakeState {
    fn handle_write(&mut self, data: &[u8]) {
        let mode = std::mem::take(&mut self.mode);

        self.mode = match mode {
            Mode::Idle => {
                if data == [0x40, 0x60] {
                    self.pending.push_back(vec![0x00, 0x00]);
                    Mode::Ready
                } else {
                    Mode::Idle
                }
            }
            Mode::Ready => self.handle_command(data),
            Mode::Receiving {
                path,
                expected,
                data: mut received,
            } => match data.first() {
                Some(0x05) => {
                    received.extend_from_slice(&data[1..]);
                    if received.len() >= expected {
                        self.store(path, received);
                        Mode::Ready
                    } else {
                        Mode::Receiving {
                            path,
                            expected,
                            data: received,
                        }
                    }
                }
                _ => self.disconnect(),
            },
            Mode::AwaitBegin { data: file } => {
                if data == [0x04] {
                    if file.is_empty() {
                        Mode::AwaitAck
                    } else {
                        Mode::Sending {
                            data: file,
                            offset: 0,
                        }
                    }
                } else {
                    Mode::AwaitBegin { data: file }
                }
            }
            Mode::AwaitAck if data == [0xFF, 0x00] => Mode::Ready,
            Mode::Sending { .. } | Mode::AwaitAck | Mode::Listing { .. }
                if data == [0x04] =>
            {
                self.disconnect()
            }
            Mode::Listing { mut entries } if data == [0x0E] => {
                let frame = entries.pop_front().unwrap_or_else(|| vec![0xFF, 0x00]);
                self.pending.push_back(frame);
                Mode::Listing { entries }
            }
            other => other,
        };
    }

    fn handle_command(&mut self, data: &[u8]) -> Mode {
        match data {
            [0x04] => self.disconnect(),
            [0x03, 0x01, rest @ ..] => {
                let (path, payload) = split_path(rest);
                let size = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);

                if self.reject_uploads {
                    self.pending.push_back(vec![0x02]);
                    return Mode::Ready;
                }

                self.pending.push_back(vec![0x04, 0x00]);
                if size == 0 {
                    self.store(path, Vec::new());
                    Mode::Ready
                } else {
                    Mode::Receiving {
                        path,
                        expected: size as usize,
                        data: Vec::new(),
                    }
                }
            }
            [0x07, 0x01, rest @ ..] => {
                let (path, _) = split_path(rest);
                match self.files.get(&path) {
                    Some(file) => {
                        self.pending.push_back(file_header(file.len() as u32));
                        Mode::AwaitBegin { data: file.clone() }
                    }
                    None => {
                        self.pending.push_back(vec![0x02, 0x00]);
                        Mode::Ready
                    }
                }
            }
            [0x0D, rest @ ..] => {
                let (path, _) = split_path(rest);
                self.pending.push_back(vec![0x00, 0x00]);
                Mode::Listing {
                    entries: self.children(&path),
                }
            }
            _ => Mode::Ready,
        }
    }

    fn handle_read(&mut self, max_len: usize) -> Option<Vec<u8>> {
        if let Some(frame) = self.pending.pop_front() {
            let len = frame.len().min(max_len);
            return Some(frame[..len].to_vec());
        }

        if let Mode::Sending { data, offset } = &mut self.mode {
            let n = (data.len() - *offset).min(max_len.saturating_sub(1)).min(253);
            let mut frame = vec![0x05];
            frame.extend_from_slice(&data[*offset..*offset + n]);
            *offset += n;
            if *offset == data.len() {
                self.mode = Mode::AwaitAck;
            }
            return Some(frame);
        }

        None
    }

    fn store(&mut self, path: String, data: Vec<u8>) {
        self.files.insert(path, data);
        if self.withhold_confirmation {
            self.pending.push_back(vec![0x00, 0x00]);
        } else {
            self.pending.push_back(vec![0x00, 0xFF, 0x00]);
        }
    }

    fn disconnect(&mut self) -> Mode {
        self.disconnects += 1;
        self.pending.clear();
        Mode::Idle
    }

    fn children(&self, dir: &str) -> VecDeque<Vec<u8>> {
        let dir = dir.trim_end_matches('/');
        let is_child = |path: &str| match path.rsplit_once('/') {
            Some((parent, name)) => parent == dir && !name.is_empty(),
            None => false,
        };
        let name_of = |path: &str| path.rsplit_once('/').map(|(_, n)| n.to_owned()).unwrap_or_default();

        let dirs = self
            .dirs
            .iter()
            .filter(|p| is_child(p))
            .map(|p| entry_frame(true, 0, FAKE_MTIME, &name_of(p)));
        let files = self
            .files
            .iter()
            .filter(|(p, _)| is_child(p))
            .map(|(p, d)| entry_frame(false, d.len() as u32, FAKE_MTIME, &name_of(p)));

        dirs.chain(files).collect()
    }
}

fn split_path(buf: &[u8]) -> (String, &[u8]) {
    let nul = buf.iter().position(|&b| b == 0).expect("path terminator");
    let path = String::from_utf8(buf[..nul].to_vec()).expect("utf-8 path");
    (path, &buf[nul + 1..])
}

#[async_trait]
impl Transport for FakeCalculator {
    async fn write(&mut self, data: &[u8], timeout: Duration) -> Result<usize> {
        self.log.record_write(data, timeout);
        self.state.lock().unwrap().handle_write(data);
        Ok(data.len())
    }

    async fn read(&mut self, max_len: usize, timeout: Duration) -> Result<BytesMut> {
        self.log.record_read(max_len, timeout);
        let frame = self
            .state
            .lock()
            .unwrap()
            .handle_read(max_len)
            .ok_or(Error::ReadTimeout(timeout))?;
        Ok(BytesMut::from(frame.as_slice()))
    }

    async fn release(&mut self) -> Result<()> {
        self.log.record_release();
        Ok(())
    }

    fn is_open(&self) -> bool {
        !self.log.released()
    }

    fn description(&self) -> String {
        "fake calculator".into()
    }
}
