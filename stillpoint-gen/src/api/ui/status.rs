//! Status page handler - real-time record status with audio player
//!
//! Renders one of three views keyed on status: in-progress indicator,
//! audio player, or failure message. Purely reactive over SSE; the
//! only fetch is the initial record snapshot.

use axum::response::{Html, IntoResponse};

/// GET /meditations/{id}/view
pub async fn status_page() -> impl IntoResponse {
    Html(STATUS_PAGE_HTML)
}

const STATUS_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Stillpoint - Your meditation</title>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
        }
        header {
            background-color: #2a2a2a;
            border-bottom: 1px solid #3a3a3a;
            padding: 20px;
            margin-bottom: 30px;
        }
        h1 {
            font-size: 26px;
            color: #4a9eff;
        }
        .connection-status {
            display: inline-block;
            padding: 3px 8px;
            border-radius: 10px;
            font-size: 12px;
            font-weight: 600;
            margin-left: 10px;
            background: #f59e0b;
            color: #fff;
        }
        .connection-status.connected {
            background: #10b981;
        }
        .container {
            max-width: 560px;
            margin: 0 auto;
            padding: 0 20px 40px;
            text-align: center;
        }
        .view {
            display: none;
            margin-top: 40px;
        }
        .view.active {
            display: block;
        }
        .spinner {
            margin: 0 auto 20px;
            width: 48px;
            height: 48px;
            border: 4px solid #3a3a3a;
            border-top-color: #4a9eff;
            border-radius: 50%;
            animation: spin 1s linear infinite;
        }
        @keyframes spin {
            to { transform: rotate(360deg); }
        }
        audio {
            width: 100%;
            margin-top: 20px;
        }
        .failed {
            color: #ef4444;
        }
        a {
            color: #4a9eff;
        }
        .again {
            display: inline-block;
            margin-top: 30px;
        }
    </style>
</head>
<body>
    <header>
        <h1>Stillpoint <span class="connection-status" id="connection-status">connecting</span></h1>
    </header>
    <div class="container">
        <div class="view active" id="view-pending">
            <div class="spinner"></div>
            <p>Composing your meditation&hellip;</p>
            <p style="color: #888;">This usually takes under a minute. The page updates by itself.</p>
        </div>
        <div class="view" id="view-completed">
            <p>Your meditation is ready. Find a quiet spot, press play.</p>
            <audio id="player" controls></audio>
        </div>
        <div class="view" id="view-failed">
            <p class="failed">Something went wrong while generating your meditation.</p>
            <p style="color: #888;">Please try again.</p>
        </div>
        <a class="again" href="/">Start another meditation</a>
    </div>
    <script>
        // /meditations/{id}/view
        const meditationId = window.location.pathname.split('/')[2];
        const connectionStatus = document.getElementById('connection-status');

        function showView(name) {
            for (const view of document.querySelectorAll('.view')) {
                view.classList.remove('active');
            }
            document.getElementById(`view-${name}`).classList.add('active');
        }

        function render(status, audioUrl) {
            if (status === 'COMPLETED') {
                document.getElementById('player').src = audioUrl;
                showView('completed');
            } else if (status === 'FAILED') {
                showView('failed');
            } else {
                showView('pending');
            }
        }

        async function loadSnapshot() {
            const response = await fetch(`/meditations/${meditationId}`);
            if (!response.ok) {
                showView('failed');
                return;
            }
            const meditation = await response.json();
            render(meditation.status, meditation.audio_url);
        }

        function subscribe() {
            const source = new EventSource(`/meditations/${meditationId}/events`);
            source.addEventListener('ConnectionStatus', () => {
                connectionStatus.textContent = 'connected';
                connectionStatus.classList.add('connected');
            });
            source.addEventListener('MeditationCompleted', (e) => {
                const event = JSON.parse(e.data);
                render('COMPLETED', event.audio_url);
            });
            source.addEventListener('MeditationFailed', () => {
                render('FAILED', null);
            });
            source.onerror = () => {
                connectionStatus.textContent = 'reconnecting';
                connectionStatus.classList.remove('connected');
            };
        }

        loadSnapshot();
        subscribe();
    </script>
</body>
</html>"#;
