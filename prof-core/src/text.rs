//! User-facing strings (Spanish, as shown in the app).

/// Required field left empty.
pub const REQUIRED_FIELDS: &str = "Por favor completa todos los campos.";
/// Email and password missing on login.
pub const LOGIN_REQUIRED: &str = "Por favor ingresa tu email y contraseña.";
/// Malformed email.
pub const INVALID_EMAIL: &str = "El correo electrónico no es válido.";
/// Email missing on the password-recovery form.
pub const EMAIL_REQUIRED: &str = "Por favor ingresa tu correo electrónico.";
/// Password below the strength policy.
pub const WEAK_PASSWORD: &str = "La contraseña debe tener al menos 8 caracteres, mayúscula, minúscula, número y algun carácter especial.";
/// Confirmation does not match.
pub const PASSWORD_MISMATCH: &str = "Las contraseñas no coinciden.";
/// Phone with the wrong number of digits.
pub const INVALID_PHONE: &str = "El teléfono debe tener entre 8 y 9 dígitos.";
/// Non-numeric years of experience.
pub const INVALID_EXPERIENCE: &str = "Los años de experiencia deben ser un número entero.";
/// Non-numeric coverage radius.
pub const INVALID_RADIUS: &str = "El radio de cobertura debe ser un número mayor a cero.";
/// Professional registration without a profession.
pub const PROFESSION_REQUIRED: &str = "Por favor ingresa tu profesión.";

/// Confirmation after requesting a password reset.
pub const RESET_REQUESTED: &str =
    "Si el correo es válido, recibirás instrucciones para restablecer tu contraseña.";

/// Prompt shown by the search screen for an empty query.
pub const SEARCH_PROMPT: &str = "Ingresa una profesión para buscar";
/// Search ran but matched nothing.
pub const SEARCH_EMPTY: &str = "No se encontraron profesionales";

/// Banner after a successful connect.
pub const CONNECTED: &str = "¡Conexión creada! Ya puedes enviar mensajes.";
/// Banner after a successful disconnect.
pub const DISCONNECTED: &str = "Conexión eliminada.";
/// Banner when the backend reports the pair is already connected.
pub const ALREADY_CONNECTED: &str = "Ya estás conectado con este profesional.";
/// Connect attempted without a signed-in user or target.
pub const LOGIN_TO_CONNECT: &str = "Debes iniciar sesión para conectar con un profesional.";

/// Button label while not connected.
pub const CONNECT_LABEL: &str = "Conectar";
/// Button label while connected.
pub const DISCONNECT_LABEL: &str = "Desconectar";
/// Button label while a create request is in flight.
pub const CONNECTING_LABEL: &str = "Conectando...";
/// Button label while a delete request is in flight.
pub const DISCONNECTING_LABEL: &str = "Desconectando...";

/// Fallback for a failed login.
pub const LOGIN_FAILED: &str = "Error al iniciar sesión";
/// Fallback for a failed registration.
pub const REGISTER_FAILED: &str = "Error al registrarse";
/// Fallback for a failed profile fetch.
pub const PROFILE_FAILED: &str = "Error al obtener perfil";
/// Fallback for a failed professionals listing.
pub const PROFESSIONALS_FAILED: &str = "Error al obtener profesionales";
/// Fallback for a failed search.
pub const SEARCH_FAILED: &str = "Error al buscar profesionales";
/// Fallback for a failed connect.
pub const CONNECT_FAILED: &str = "No se pudo crear la conexión";
/// Fallback for a failed disconnect.
pub const DISCONNECT_FAILED: &str = "No se pudo eliminar la conexión";
/// Fallback for a failed connections listing.
pub const CONNECTIONS_FAILED: &str = "No se pudieron cargar tus conversaciones";
/// Fallback for transport failures.
pub const NETWORK_ERROR: &str = "Error de red";

/// Greeting pre-filled in the WhatsApp contact link.
pub const WHATSAPP_GREETING: &str = "Hola, te contacto desde ProfesionalesUY";
