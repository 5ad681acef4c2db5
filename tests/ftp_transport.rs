use ftp_bridge::connections::ftp::FtpConnection;
use ftp_bridge::connections::{ConnectionParams, Transport};
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

mod common;
use common::init_logging;

fn reply(control: &mut TcpStream, line: &str) {
    control
        .write_all(format!("{}\r\n", line).as_bytes())
        .expect("write reply");
}

/// A one-session FTP server on localhost. `RETR` serves `payload` over a
/// passive data connection, or answers 550 when there is none.
/// The thread returns every command line it received.
fn scripted_server(payload: Option<Vec<u8>>) -> (u16, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind control port");
    let port = listener.local_addr().expect("control address").port();

    let handle = thread::spawn(move || {
        let (mut control, _) = listener.accept().expect("accept control connection");
        let mut lines = BufReader::new(control.try_clone().expect("clone control stream"));
        let mut data_listener: Option<TcpListener> = None;
        let mut commands = Vec::new();

        reply(&mut control, "220 ready");
        let mut line = String::new();
        while lines.read_line(&mut line).unwrap_or(0) > 0 {
            let command = line.trim_end().to_string();
            line.clear();
            let verb = command
                .split(' ')
                .next()
                .unwrap_or_default()
                .to_ascii_uppercase();
            commands.push(command);

            match verb.as_str() {
                "USER" => reply(&mut control, "331 password please"),
                "PASS" => reply(&mut control, "230 logged in"),
                "TYPE" => reply(&mut control, "200 type set"),
                "PASV" => {
                    let data = TcpListener::bind("127.0.0.1:0").expect("bind data port");
                    let data_port = data.local_addr().expect("data address").port();
                    data_listener = Some(data);
                    reply(
                        &mut control,
                        &format!(
                            "227 Entering Passive Mode (127,0,0,1,{},{})",
                            data_port >> 8,
                            data_port & 0xff
                        ),
                    );
                }
                "RETR" => match &payload {
                    Some(bytes) => {
                        reply(&mut control, "150 opening data connection");
                        let data = data_listener.take().expect("PASV before RETR");
                        let (mut channel, _) = data.accept().expect("accept data connection");
                        channel.write_all(bytes).expect("send payload");
                        drop(channel);
                        reply(&mut control, "226 transfer complete");
                    }
                    None => reply(&mut control, "550 no such file"),
                },
                "QUIT" => {
                    reply(&mut control, "221 bye");
                    break;
                }
                _ => reply(&mut control, "502 not implemented"),
            }
        }
        commands
    });

    (port, handle)
}

fn local_params(port: u16) -> ConnectionParams {
    ConnectionParams::new(format!("127.0.0.1:{}", port), "alice", "secret", false)
}

#[test]
fn download_streams_the_remote_file_to_disk() -> anyhow::Result<()> {
    init_logging();
    let payload: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    let (port, server) = scripted_server(Some(payload.clone()));
    let target = tempfile::tempdir()?;
    let local = target.path().join("data.bin");

    let mut connection = FtpConnection::new(local_params(port))?;
    connection.connect()?;
    let size = connection.download_file("/data.bin", &local)?;
    connection.disconnect()?;

    assert_eq!(size, payload.len() as u64);
    assert_eq!(fs::read(&local)?, payload);

    let commands = server.join().expect("server thread");
    assert!(commands.contains(&"PASS secret".to_string()));
    assert!(commands.contains(&"TYPE I".to_string()));
    assert!(commands.contains(&"RETR /data.bin".to_string()));
    Ok(())
}

#[test]
fn failed_download_leaves_no_partial_file() -> anyhow::Result<()> {
    init_logging();
    let (port, server) = scripted_server(None);
    let target = tempfile::tempdir()?;
    let local = target.path().join("missing.bin");

    let mut connection = FtpConnection::new(local_params(port))?;
    connection.connect()?;
    assert!(connection.download_file("/missing.bin", &local).is_err());
    assert!(!local.exists(), "the local file must be removed again");
    connection.disconnect()?;

    server.join().expect("server thread");
    Ok(())
}

#[test]
fn silent_server_times_out_instead_of_blocking() -> anyhow::Result<()> {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    let server = thread::spawn(move || {
        let (mut control, _) = listener.accept().expect("accept control connection");
        reply(&mut control, "220 ready");
        // Never answer USER.
        thread::sleep(Duration::from_secs(3));
    });

    let mut connection =
        FtpConnection::new(local_params(port))?.with_timeout(Duration::from_millis(300));
    let started = Instant::now();
    assert!(connection.connect().is_err());
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "connect took {:?}",
        started.elapsed()
    );
    assert!(!connection.is_connected());

    server.join().expect("server thread");
    Ok(())
}
