//! SSH 터널
//!
//! 개발 환경에서 원격 데이터베이스에 접근하기 위해 시스템 `ssh` 클라이언트로
//! 로컬 포트 포워딩(`ssh -N -L`)을 띄웁니다. 비밀번호 인증이 필요하면
//! `sshpass -e`로 감싸며, 비밀번호는 명령행이 아니라 `SSHPASS` 환경변수로 전달합니다.
//!
//! 터널은 프로세스 전역 [`TUNNEL_MANAGER`]에 이름으로 등록되며,
//! 서버 종료 시 [`TunnelManager::close_all_tunnels`]로 정리됩니다.

use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;

use once_cell::sync::Lazy;
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use crate::config::{DbType, TunnelConfig};
use crate::core::errors::{AppError, AppResult};

pub const DEFAULT_TUNNEL: &str = "default";

/// 터널 생성에 필요한 접속 정보
#[derive(Debug, Clone)]
pub struct TunnelSettings {
    pub ssh_host: String,
    pub ssh_port: u16,
    pub ssh_user: String,
    pub ssh_password: Option<String>,
    pub ssh_key_path: Option<String>,
    pub remote_host: String,
    pub remote_port: u16,
    pub ready_timeout: Duration,
}

impl TunnelSettings {
    /// # Errors
    ///
    /// `SSH_HOST` 또는 `SSH_USER`가 없으면 `AppError::InternalError`
    pub fn from_env(db_type: DbType) -> AppResult<Self> {
        let ssh_host = TunnelConfig::ssh_host()
            .ok_or_else(|| AppError::InternalError("SSH_HOST 설정이 되지 않았습니다.".to_string()))?;
        let ssh_user = TunnelConfig::ssh_user()
            .ok_or_else(|| AppError::InternalError("SSH_USER 설정이 되지 않았습니다.".to_string()))?;

        Ok(Self {
            ssh_host,
            ssh_port: TunnelConfig::ssh_port(),
            ssh_user,
            ssh_password: TunnelConfig::ssh_password(),
            ssh_key_path: TunnelConfig::ssh_key_path(),
            remote_host: TunnelConfig::remote_db_host(),
            remote_port: TunnelConfig::remote_db_port(db_type),
            ready_timeout: Duration::from_secs(TunnelConfig::ready_timeout_secs()),
        })
    }

    /// 실행할 프로그램과 인자 목록
    pub fn command_line(&self, local_port: u16) -> (&'static str, Vec<String>) {
        let mut args = Vec::new();

        if self.ssh_password.is_some() {
            args.push("-e".to_string());
            args.push("ssh".to_string());
        }

        args.extend([
            "-N".to_string(),
            "-L".to_string(),
            format!("{}:{}:{}", local_port, self.remote_host, self.remote_port),
            "-p".to_string(),
            self.ssh_port.to_string(),
            "-o".to_string(),
            "ExitOnForwardFailure=yes".to_string(),
            "-o".to_string(),
            "ServerAliveInterval=60".to_string(),
        ]);

        if let Some(key_path) = &self.ssh_key_path {
            args.push("-i".to_string());
            args.push(key_path.clone());
        }

        if self.ssh_password.is_some() {
            args.push("-o".to_string());
            args.push("StrictHostKeyChecking=accept-new".to_string());
        }

        args.push(format!("{}@{}", self.ssh_user, self.ssh_host));

        let program = if self.ssh_password.is_some() { "sshpass" } else { "ssh" };
        (program, args)
    }
}

/// 실행 중인 포워딩 프로세스
pub struct SshTunnel {
    child: Child,
    local_port: u16,
}

impl SshTunnel {
    pub async fn open(settings: &TunnelSettings) -> AppResult<Self> {
        let local_port = free_local_port()?;
        let (program, args) = settings.command_line(local_port);

        let mut command = Command::new(program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(password) = &settings.ssh_password {
            command.env("SSHPASS", password);
        }

        let child = command.spawn().map_err(|e| {
            AppError::InternalError(format!("SSH 터널링 생성 실패 ({}): {}", program, e))
        })?;

        let mut tunnel = Self { child, local_port };
        if let Err(err) = tunnel.wait_until_ready(settings.ready_timeout).await {
            tunnel.close().await;
            return Err(err);
        }

        log::info!(
            "SSH 터널링 생성 완료: localhost:{} -> {}:{} -> {}:{}",
            local_port,
            settings.ssh_host,
            settings.ssh_port,
            settings.remote_host,
            settings.remote_port
        );
        Ok(tunnel)
    }

    async fn wait_until_ready(&mut self, timeout: Duration) -> AppResult<()> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if let Ok(Some(status)) = self.child.try_wait() {
                return Err(AppError::InternalError(format!(
                    "SSH 터널 프로세스가 종료되었습니다: {}",
                    status
                )));
            }

            if TcpStream::connect(("127.0.0.1", self.local_port)).await.is_ok() {
                return Ok(());
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(AppError::InternalError(format!(
                    "SSH 터널 준비 시간 초과 ({}초)",
                    timeout.as_secs()
                )));
            }

            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    }

    pub fn local_port(&self) -> u16 {
        self.local_port
    }

    pub fn is_active(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    pub async fn close(&mut self) {
        if let Err(e) = self.child.kill().await {
            log::error!("SSH 터널링 종료 중 오류: {}", e);
        } else {
            log::info!("SSH 터널링 종료 (localhost:{})", self.local_port);
        }
    }
}

/// 이름으로 관리되는 터널 레지스트리
pub struct TunnelManager {
    tunnels: Mutex<HashMap<String, SshTunnel>>,
}

pub static TUNNEL_MANAGER: Lazy<TunnelManager> = Lazy::new(TunnelManager::new);

impl TunnelManager {
    fn new() -> Self {
        Self {
            tunnels: Mutex::new(HashMap::new()),
        }
    }

    /// 활성 터널이 있으면 그 포트를, 없으면 새로 만들어 로컬 포트를 반환합니다.
    pub async fn get_or_create_tunnel(&self, key: &str, settings: &TunnelSettings) -> AppResult<u16> {
        let mut tunnels = self.tunnels.lock().await;

        if let Some(tunnel) = tunnels.get_mut(key) {
            if tunnel.is_active() {
                log::info!("SSH 터널이 이미 활성화되어 있습니다: {}", key);
                return Ok(tunnel.local_port());
            }
            log::warn!("비활성 SSH 터널 제거 후 재생성: {}", key);
            tunnels.remove(key);
        }

        let tunnel = SshTunnel::open(settings).await.map_err(|e| {
            log::error!("터널 생성 실패: {}", e);
            e
        })?;
        let port = tunnel.local_port();
        tunnels.insert(key.to_string(), tunnel);
        log::info!("새로운 SSH 터널 생성: {} -> localhost:{}", key, port);

        Ok(port)
    }

    pub async fn close_tunnel(&self, key: &str) {
        let removed = self.tunnels.lock().await.remove(key);
        if let Some(mut tunnel) = removed {
            tunnel.close().await;
            log::info!("터널 종료: {}", key);
        }
    }

    pub async fn close_all_tunnels(&self) {
        let mut tunnels = self.tunnels.lock().await;
        if tunnels.is_empty() {
            return;
        }
        for (_, tunnel) in tunnels.iter_mut() {
            tunnel.close().await;
        }
        tunnels.clear();
        log::info!("모든 SSH 터널 종료");
    }

    pub async fn is_active(&self, key: &str) -> bool {
        self.tunnels
            .lock()
            .await
            .get_mut(key)
            .is_some_and(|tunnel| tunnel.is_active())
    }

    pub async fn local_port(&self, key: &str) -> Option<u16> {
        self.tunnels.lock().await.get(key).map(SshTunnel::local_port)
    }
}

fn free_local_port() -> AppResult<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")
        .map_err(|e| AppError::InternalError(format!("로컬 포트 할당 실패: {}", e)))?;
    let port = listener
        .local_addr()
        .map_err(|e| AppError::InternalError(format!("로컬 포트 조회 실패: {}", e)))?
        .port();
    Ok(port)
}
